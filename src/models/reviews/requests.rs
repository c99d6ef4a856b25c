use serde::Deserialize;
use ts_rs::TS;

// 评分请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/review.ts")]
pub struct ReviewRequest {
    pub score: i32,
    #[serde(default)]
    pub feedback: String,
}

// 存储层 upsert 参数
#[derive(Debug, Clone)]
pub struct UpsertReview {
    pub submission_id: i64,
    pub reviewer: i64,
    pub score: i32,
    pub feedback: String,
}
