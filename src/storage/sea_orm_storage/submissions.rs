//! 提交存储操作

use std::collections::{HashMap, HashSet};

use super::SeaOrmStorage;
use crate::entity::profiles::{Column as ProfileColumn, Entity as Profiles};
use crate::entity::reviews::{Column as ReviewColumn, Entity as Reviews};
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::entity::tutorials::{Column as TutorialColumn, Entity as Tutorials};
use crate::errors::{ArtClubError, Result};
use crate::models::submissions::{
    entities::{Submission, SubmissionDetail},
    requests::CreateSubmission,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    pub async fn create_submission_impl(&self, req: CreateSubmission) -> Result<Submission> {
        let model = ActiveModel {
            user_id: Set(req.user_id),
            lesson_id: Set(req.lesson_id),
            file_path: Set(req.file_path),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| ArtClubError::database_operation(format!("创建提交失败: {e}")))?;

        Ok(result.into_submission())
    }

    /// 通过 ID 获取提交
    pub async fn get_submission_by_id_impl(&self, id: i64) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ArtClubError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 列出提交并批量加载课程、学员与评分
    pub async fn list_submission_details_impl(
        &self,
        user_id: Option<i64>,
    ) -> Result<Vec<SubmissionDetail>> {
        let mut select = Submissions::find();
        if let Some(user_id) = user_id {
            select = select.filter(Column::UserId.eq(user_id));
        }

        let submissions = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| ArtClubError::database_operation(format!("查询提交列表失败: {e}")))?;

        if submissions.is_empty() {
            return Ok(Vec::new());
        }

        let lesson_ids: Vec<i64> = submissions
            .iter()
            .map(|s| s.lesson_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let user_ids: Vec<i64> = submissions
            .iter()
            .map(|s| s.user_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let submission_ids: Vec<i64> = submissions.iter().map(|s| s.id).collect();

        let lesson_map: HashMap<i64, _> = Tutorials::find()
            .filter(TutorialColumn::Id.is_in(lesson_ids))
            .all(&self.db)
            .await
            .map_err(|e| ArtClubError::database_operation(format!("查询课程信息失败: {e}")))?
            .into_iter()
            .map(|t| (t.id, t.into_tutorial()))
            .collect();

        let student_map: HashMap<i64, _> = Profiles::find()
            .filter(ProfileColumn::Id.is_in(user_ids))
            .all(&self.db)
            .await
            .map_err(|e| ArtClubError::database_operation(format!("查询学员信息失败: {e}")))?
            .into_iter()
            .map(|p| (p.id, p.into_profile()))
            .collect();

        let mut review_map: HashMap<i64, _> = Reviews::find()
            .filter(ReviewColumn::SubmissionId.is_in(submission_ids))
            .all(&self.db)
            .await
            .map_err(|e| ArtClubError::database_operation(format!("查询评分信息失败: {e}")))?
            .into_iter()
            .map(|r| (r.submission_id, r.into_review()))
            .collect();

        Ok(submissions
            .into_iter()
            .map(|s| SubmissionDetail {
                lesson: lesson_map.get(&s.lesson_id).cloned(),
                student: student_map.get(&s.user_id).cloned(),
                review: review_map.remove(&s.id),
                submission: s.into_submission(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profiles::entities::UserRole;
    use crate::models::reviews::requests::UpsertReview;
    use crate::models::tutorials::entities::TutorialCategory;
    use crate::storage::sea_orm_storage::test_support::{
        seed_profile, seed_submission, seed_tutorial,
    };

    #[tokio::test]
    async fn test_details_join_lesson_student_review() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let student = seed_profile(&storage, "fay@artclub.org", UserRole::Student).await;
        let other = seed_profile(&storage, "gus@artclub.org", UserRole::Student).await;
        let staff = seed_profile(&storage, "hal@artclub.org", UserRole::Staff).await;
        let lesson = seed_tutorial(&storage, "Value study", TutorialCategory::Sketching).await;

        let reviewed = seed_submission(&storage, student.id, lesson.id).await;
        seed_submission(&storage, other.id, lesson.id).await;
        storage
            .upsert_review_impl(UpsertReview {
                submission_id: reviewed.id,
                reviewer: staff.id,
                score: 92,
                feedback: "Great contrast".into(),
            })
            .await
            .unwrap();

        let all = storage.list_submission_details_impl(None).await.unwrap();
        assert_eq!(all.len(), 2);

        let mine = storage
            .list_submission_details_impl(Some(student.id))
            .await
            .unwrap();
        assert_eq!(mine.len(), 1);
        let detail = &mine[0];
        assert_eq!(detail.lesson.as_ref().map(|l| l.id), Some(lesson.id));
        assert_eq!(detail.student.as_ref().map(|p| p.id), Some(student.id));
        assert_eq!(detail.review.as_ref().map(|r| r.score), Some(92));
    }

    #[tokio::test]
    async fn test_submission_requires_existing_lesson() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let student = seed_profile(&storage, "ivy@artclub.org", UserRole::Student).await;
        let result = storage
            .create_submission_impl(CreateSubmission {
                user_id: student.id,
                lesson_id: 404,
                file_path: "x.pdf".into(),
            })
            .await;
        assert!(result.is_err());
    }
}
