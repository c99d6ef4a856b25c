use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::profiles::entities::Profile;
use crate::models::reviews::entities::Review;
use crate::models::tutorials::entities::Tutorial;

// 作业提交
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct Submission {
    pub id: i64,
    pub user_id: i64,
    pub lesson_id: i64,
    /// homework bucket 内的对象路径
    pub file_path: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 提交及其关联数据（存储层联表查询结果）
#[derive(Debug, Clone)]
pub struct SubmissionDetail {
    pub submission: Submission,
    pub lesson: Option<Tutorial>,
    pub student: Option<Profile>,
    pub review: Option<Review>,
}
