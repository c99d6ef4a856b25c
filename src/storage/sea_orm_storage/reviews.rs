use super::SeaOrmStorage;
use crate::entity::reviews::{ActiveModel, Column, Entity as Reviews};
use crate::errors::{ArtClubError, Result};
use crate::models::reviews::{entities::Review, requests::UpsertReview};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 每个提交最多一条评分：存在则覆盖，否则新建
    pub async fn upsert_review_impl(&self, req: UpsertReview) -> Result<(Review, bool)> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| ArtClubError::database_operation(format!("开启事务失败: {e}")))?;

        let existing = Reviews::find()
            .filter(Column::SubmissionId.eq(req.submission_id))
            .one(&txn)
            .await
            .map_err(|e| ArtClubError::database_operation(format!("查询评分失败: {e}")))?;

        let (model, created) = match existing {
            Some(found) => {
                let mut active = found.into_active_model();
                active.reviewer = Set(req.reviewer);
                active.score = Set(req.score);
                active.feedback = Set(req.feedback);
                active.updated_at = Set(now);
                let updated = active
                    .update(&txn)
                    .await
                    .map_err(|e| ArtClubError::database_operation(format!("更新评分失败: {e}")))?;
                (updated, false)
            }
            None => {
                let inserted = ActiveModel {
                    submission_id: Set(req.submission_id),
                    reviewer: Set(req.reviewer),
                    score: Set(req.score),
                    feedback: Set(req.feedback),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&txn)
                .await
                .map_err(|e| ArtClubError::database_operation(format!("创建评分失败: {e}")))?;
                (inserted, true)
            }
        };

        txn.commit()
            .await
            .map_err(|e| ArtClubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok((model.into_review(), created))
    }

    pub async fn get_review_by_submission_impl(&self, submission_id: i64) -> Result<Option<Review>> {
        let result = Reviews::find()
            .filter(Column::SubmissionId.eq(submission_id))
            .one(&self.db)
            .await
            .map_err(|e| ArtClubError::database_operation(format!("查询评分失败: {e}")))?;

        Ok(result.map(|m| m.into_review()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profiles::entities::UserRole;
    use crate::models::tutorials::entities::TutorialCategory;
    use crate::storage::sea_orm_storage::test_support::{
        seed_profile, seed_submission, seed_tutorial,
    };
    use sea_orm::PaginatorTrait;

    #[tokio::test]
    async fn test_upsert_keeps_single_review() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let student = seed_profile(&storage, "jo@artclub.org", UserRole::Student).await;
        let staff = seed_profile(&storage, "kai@artclub.org", UserRole::Staff).await;
        let lesson = seed_tutorial(&storage, "Hue shifts", TutorialCategory::Color).await;
        let submission = seed_submission(&storage, student.id, lesson.id).await;

        let (first, created) = storage
            .upsert_review_impl(UpsertReview {
                submission_id: submission.id,
                reviewer: staff.id,
                score: 70,
                feedback: "Muddy midtones".into(),
            })
            .await
            .unwrap();
        assert!(created);

        let (second, created) = storage
            .upsert_review_impl(UpsertReview {
                submission_id: submission.id,
                reviewer: staff.id,
                score: 85,
                feedback: "Much better".into(),
            })
            .await
            .unwrap();
        assert!(!created);
        assert_eq!(first.id, second.id);
        assert_eq!(second.score, 85);

        let count = Reviews::find().count(&storage.db).await.unwrap();
        assert_eq!(count, 1);
        let stored = storage
            .get_review_by_submission_impl(submission.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.feedback, "Much better");
    }
}
