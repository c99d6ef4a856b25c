use serde::Serialize;
use ts_rs::TS;

use super::entities::Poster;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/poster.ts")]
pub struct PosterListResponse {
    pub items: Vec<Poster>,
}
