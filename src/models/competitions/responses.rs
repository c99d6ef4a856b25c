use serde::Serialize;
use ts_rs::TS;

use super::entities::Competition;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/competition.ts")]
pub struct CompetitionListResponse {
    pub items: Vec<Competition>,
}
