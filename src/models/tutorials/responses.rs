use serde::Serialize;
use ts_rs::TS;

use super::entities::Tutorial;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/tutorial.ts")]
pub struct TutorialListResponse {
    pub items: Vec<Tutorial>,
}
