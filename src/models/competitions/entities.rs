use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 比赛相对当前时间的状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/competition.ts")]
pub enum CompetitionStatus {
    Upcoming,
    Ongoing,
    Ended,
}

// 比赛
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/competition.ts")]
pub struct Competition {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub awards: Vec<String>,
    pub published: bool,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Competition {
    pub fn status_at(&self, now: DateTime<Utc>) -> CompetitionStatus {
        if now < self.start_at {
            CompetitionStatus::Upcoming
        } else if now > self.end_at {
            CompetitionStatus::Ended
        } else {
            CompetitionStatus::Ongoing
        }
    }
}
