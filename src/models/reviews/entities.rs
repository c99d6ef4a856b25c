use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 分数档位
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/review.ts")]
pub enum ScoreBand {
    Excellent, // >= 90
    Good,      // >= 80
    Fair,      // >= 70
    Pass,      // >= 60
    NeedsWork,
}

impl ScoreBand {
    pub fn from_score(score: i32) -> Self {
        match score {
            s if s >= 90 => ScoreBand::Excellent,
            s if s >= 80 => ScoreBand::Good,
            s if s >= 70 => ScoreBand::Fair,
            s if s >= 60 => ScoreBand::Pass,
            _ => ScoreBand::NeedsWork,
        }
    }

    /// 前端使用的文字颜色类名
    pub fn color_class(&self) -> &'static str {
        match self {
            ScoreBand::Excellent => "text-green-600",
            ScoreBand::Good => "text-blue-600",
            ScoreBand::Fair => "text-yellow-600",
            ScoreBand::Pass => "text-orange-600",
            ScoreBand::NeedsWork => "text-red-600",
        }
    }
}

// 评分
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/review.ts")]
pub struct Review {
    pub id: i64,
    pub submission_id: i64,
    pub reviewer: i64,
    pub score: i32,
    pub feedback: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Review {
    pub fn band(&self) -> ScoreBand {
        ScoreBand::from_score(self.score)
    }
}
