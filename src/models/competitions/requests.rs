use chrono::{DateTime, Utc};
use serde::Deserialize;
use ts_rs::TS;

use super::entities::CompetitionStatus;
use crate::utils::dates::parse_flexible_date;
use crate::utils::validate::validate_title;

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/competition.ts")]
pub struct CompetitionListQuery {
    pub status: Option<CompetitionStatus>,
    /// YYYY-MM-DD 或 RFC3339
    pub from: Option<String>,
    pub to: Option<String>,
}

// 创建 / 更新比赛请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/competition.ts")]
pub struct CompetitionRequest {
    pub title: String,
    #[serde(default)]
    pub body: String,
    pub start_at: String,
    pub end_at: String,
    #[serde(default)]
    pub awards: Vec<String>,
    #[serde(default)]
    pub published: bool,
}

/// 校验后的比赛数据
#[derive(Debug, Clone, PartialEq)]
pub struct CompetitionInput {
    pub title: String,
    pub body: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub awards: Vec<String>,
    pub published: bool,
}

impl CompetitionRequest {
    pub fn validate(self) -> Result<CompetitionInput, String> {
        validate_title(&self.title)?;
        let start_at = parse_flexible_date(&self.start_at)
            .ok_or_else(|| format!("Invalid start date: {}", self.start_at))?;
        let end_at = parse_flexible_date(&self.end_at)
            .ok_or_else(|| format!("Invalid end date: {}", self.end_at))?;
        if end_at < start_at {
            return Err("End date must not be earlier than start date".to_string());
        }

        let awards = self
            .awards
            .into_iter()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect();

        Ok(CompetitionInput {
            title: self.title.trim().to_string(),
            body: self.body,
            start_at,
            end_at,
            awards,
            published: self.published,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(start: &str, end: &str) -> CompetitionRequest {
        CompetitionRequest {
            title: " Autumn Colors ".into(),
            body: "Paint the season".into(),
            start_at: start.into(),
            end_at: end.into(),
            awards: vec!["Gold".into(), "  ".into(), " Silver ".into()],
            published: true,
        }
    }

    #[test]
    fn test_valid_request() {
        let input = request("2025-10-01", "2025-10-31T18:00:00Z").validate().unwrap();
        assert_eq!(input.title, "Autumn Colors");
        assert_eq!(input.awards, vec!["Gold".to_string(), "Silver".to_string()]);
        assert!(input.end_at > input.start_at);
    }

    #[test]
    fn test_end_before_start() {
        assert!(request("2025-10-31", "2025-10-01").validate().is_err());
    }

    #[test]
    fn test_same_day_allowed() {
        assert!(request("2025-10-01", "2025-10-01").validate().is_ok());
    }

    #[test]
    fn test_bad_date() {
        assert!(request("next week", "2025-10-01").validate().is_err());
    }
}
