use serde::Serialize;
use ts_rs::TS;

use super::entities::SubmissionDetail;
use crate::models::reviews::entities::ScoreBand;
use crate::models::tutorials::entities::TutorialCategory;

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionLesson {
    pub id: i64,
    pub title: String,
    pub category: TutorialCategory,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionStudent {
    pub id: i64,
    pub email: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct ReviewSummary {
    pub score: i32,
    pub feedback: String,
    pub band: ScoreBand,
    pub color_class: String,
    pub reviewer: i64,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 列表项：已评分的提交显示分数且不可再次评分
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionItem {
    pub id: i64,
    pub file_path: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub lesson: Option<SubmissionLesson>,
    pub student: Option<SubmissionStudent>,
    pub review: Option<ReviewSummary>,
    pub score_band: Option<ScoreBand>,
    pub can_grade: bool,
}

impl SubmissionItem {
    /// `viewer_can_grade` 为查看者的评分权限
    pub fn from_detail(detail: SubmissionDetail, viewer_can_grade: bool) -> Self {
        let review = detail.review.map(|r| {
            let band = r.band();
            ReviewSummary {
                score: r.score,
                feedback: r.feedback,
                band,
                color_class: band.color_class().to_string(),
                reviewer: r.reviewer,
                updated_at: r.updated_at,
            }
        });

        Self {
            id: detail.submission.id,
            file_path: detail.submission.file_path,
            created_at: detail.submission.created_at,
            lesson: detail.lesson.map(|t| SubmissionLesson {
                id: t.id,
                title: t.title,
                category: t.category,
            }),
            student: detail.student.map(|p| SubmissionStudent {
                id: p.id,
                email: p.email,
                full_name: p.full_name,
                avatar_url: p.avatar_url,
            }),
            score_band: review.as_ref().map(|r| r.band),
            can_grade: viewer_can_grade && review.is_none(),
            review,
        }
    }
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionListResponse {
    pub items: Vec<SubmissionItem>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SignedUrlResponse {
    pub signed_url: String,
    pub expires_in: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::reviews::entities::Review;
    use crate::models::submissions::entities::Submission;
    use chrono::Utc;

    fn detail(score: Option<i32>) -> SubmissionDetail {
        let now = Utc::now();
        SubmissionDetail {
            submission: Submission {
                id: 11,
                user_id: 3,
                lesson_id: 2,
                file_path: "3/1700000000.pdf".into(),
                created_at: now,
            },
            lesson: None,
            student: None,
            review: score.map(|score| Review {
                id: 1,
                submission_id: 11,
                reviewer: 1,
                score,
                feedback: "Nice shading".into(),
                created_at: now,
                updated_at: now,
            }),
        }
    }

    #[test]
    fn test_reviewed_item_not_gradable() {
        let item = SubmissionItem::from_detail(detail(Some(88)), true);
        assert!(!item.can_grade);
        assert_eq!(item.review.as_ref().map(|r| r.score), Some(88));
        assert_eq!(item.score_band, Some(ScoreBand::Good));
    }

    #[test]
    fn test_pending_item_gradable_by_staff_only() {
        assert!(SubmissionItem::from_detail(detail(None), true).can_grade);
        assert!(!SubmissionItem::from_detail(detail(None), false).can_grade);
        assert!(SubmissionItem::from_detail(detail(None), true).score_band.is_none());
    }
}
