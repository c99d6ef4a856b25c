use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 首页海报
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/poster.ts")]
pub struct Poster {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
