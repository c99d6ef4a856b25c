use serde::Serialize;
use ts_rs::TS;

use crate::models::tutorials::entities::TutorialCategory;

/// 学员统计
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/stats.ts")]
pub struct StudentStatsResponse {
    pub overview: StatsOverview,
    pub categories: Vec<CategoryProgress>,
    pub recent_activity: RecentActivity,
    pub upcoming_deadlines: Vec<UpcomingDeadline>,
    pub achievements: Achievements,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/stats.ts")]
pub struct StatsOverview {
    pub total_lessons: i64,
    pub completed_lessons: i64,
    pub progress_percentage: i64,
    pub average_score: i64,
    pub total_submissions: i64,
    pub reviewed_submissions: i64,
    pub pending_reviews: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/stats.ts")]
pub struct CategoryProgress {
    pub category: TutorialCategory,
    pub completed: i64,
    pub total: i64,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/stats.ts")]
pub struct RecentActivity {
    pub count: i64,
    pub submissions: Vec<ActivityEntry>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/stats.ts")]
pub struct ActivityEntry {
    pub id: i64,
    pub lesson_id: i64,
    /// 教程标题，教程已删除时为空串
    pub lesson: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/stats.ts")]
pub struct UpcomingDeadline {
    pub id: i64,
    pub title: String,
    pub due_date: chrono::DateTime<chrono::Utc>,
    #[serde(rename = "type")]
    pub kind: String,
    pub awards: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/stats.ts")]
pub struct Achievements {
    /// 最早一次提交时间
    pub first_submission: Option<chrono::DateTime<chrono::Utc>>,
    pub perfect_scores: i64,
    pub streak_days: i64,
}
