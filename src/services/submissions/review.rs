use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::middlewares::RequireJWT;
use crate::models::realtime::{ChangeEvent, ChangeTable};
use crate::models::reviews::requests::{ReviewRequest, UpsertReview};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::realtime::publish_owned_change;
use crate::services::{internal_error, unauthorized};
use crate::utils::validate::validate_score;

/// 评分：每个提交一条，重复评分覆盖旧记录
pub async fn handle_review_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: i64,
    review: ReviewRequest,
) -> ActixResult<HttpResponse> {
    let Some(reviewer) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };
    if let Err(msg) = validate_score(review.score) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ReviewScoreInvalid,
            msg,
        )));
    }

    let storage = service.get_storage(request);
    let submission = match storage.get_submission_by_id(submission_id).await {
        Ok(Some(submission)) => submission,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SubmissionNotFound,
                "Submission not found",
            )));
        }
        Err(e) => return Ok(internal_error("查询提交失败", e)),
    };

    let upserted = storage
        .upsert_review(UpsertReview {
            submission_id,
            reviewer,
            score: review.score,
            feedback: review.feedback.trim().to_string(),
        })
        .await;

    match upserted {
        Ok((saved, created)) => {
            let event = if created {
                ChangeEvent::Insert
            } else {
                ChangeEvent::Update
            };
            publish_owned_change(ChangeTable::Reviews, event, saved.id, submission.user_id);
            tracing::info!(
                "Submission {} reviewed by {} with score {}",
                submission_id,
                reviewer,
                saved.score
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(saved, "Review saved")))
        }
        Err(e) => Ok(internal_error("保存评分失败", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profiles::entities::UserRole;
    use crate::models::realtime::RealtimeMessage;
    use crate::models::tutorials::entities::TutorialCategory;
    use crate::services::realtime::ConnectionManager;
    use crate::services::test_support::{TestContext, body_json};
    use crate::storage::sea_orm_storage::test_support::{
        seed_profile, seed_submission, seed_tutorial,
    };
    use actix_web::http::StatusCode;

    #[actix_web::test]
    async fn test_review_upsert_and_notify_owner() {
        let ctx = TestContext::new().await;
        let teacher = seed_profile(&ctx.db, "t@artclub.org", UserRole::Staff).await;
        let mia = seed_profile(&ctx.db, "mia@artclub.org", UserRole::Student).await;
        let lesson = seed_tutorial(&ctx.db, "Shadows", TutorialCategory::Sketching).await;
        let submission = seed_submission(&ctx.db, mia.id, lesson.id).await;
        let service = SubmissionService::new_lazy();

        // 内存库里的 ID 会与其他测试重复，这里只确认收到过 reviews 事件
        let mut rx = ConnectionManager::get().register(mia.id, UserRole::Student);

        let resp = handle_review_submission(
            &service,
            &ctx.request_as(&teacher),
            submission.id,
            ReviewRequest {
                score: 78,
                feedback: " Good contrast ".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["data"]["score"], 78);
        assert_eq!(body["data"]["feedback"], "Good contrast");

        let resp = handle_review_submission(
            &service,
            &ctx.request_as(&teacher),
            submission.id,
            ReviewRequest {
                score: 95,
                feedback: "Even better".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let review = ctx
            .storage
            .get_review_by_submission(submission.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(review.score, 95);

        let mut saw_review = false;
        while let Ok(message) = rx.try_recv() {
            if let RealtimeMessage::Change {
                table: ChangeTable::Reviews,
                ..
            } = message
            {
                saw_review = true;
            }
        }
        assert!(saw_review);
        ConnectionManager::get().unregister(mia.id);
    }

    #[actix_web::test]
    async fn test_score_out_of_range() {
        let ctx = TestContext::new().await;
        let teacher = seed_profile(&ctx.db, "t@artclub.org", UserRole::Staff).await;
        let resp = handle_review_submission(
            &SubmissionService::new_lazy(),
            &ctx.request_as(&teacher),
            1,
            ReviewRequest {
                score: 120,
                feedback: String::new(),
            },
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["code"], ErrorCode::ReviewScoreInvalid as i32);
    }
}
