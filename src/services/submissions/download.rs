use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::middlewares::RequireJWT;
use crate::models::submissions::responses::SignedUrlResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::object_store::Bucket;
use crate::services::{forbidden, get_object_store, internal_error, unauthorized};

/// 生成作业文件的限时下载链接：本人或老师/管理员
pub async fn handle_download_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: i64,
) -> ActixResult<HttpResponse> {
    let Some(profile) = RequireJWT::extract_profile(request) else {
        return Ok(unauthorized());
    };

    let submission = match service
        .get_storage(request)
        .get_submission_by_id(submission_id)
        .await
    {
        Ok(Some(submission)) => submission,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SubmissionNotFound,
                "Submission not found",
            )));
        }
        Err(e) => return Ok(internal_error("查询提交失败", e)),
    };

    if submission.user_id != profile.id && !profile.role.is_staff_or_admin() {
        return Ok(forbidden("You cannot download this submission"));
    }

    let expires_in = service.get_config().upload.signed_url_expiry;
    match get_object_store(request).signed_url(
        Bucket::Homework,
        &submission.file_path,
        chrono::Duration::seconds(expires_in),
    ) {
        Ok(signed_url) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SignedUrlResponse {
                signed_url,
                expires_in,
            },
            "获取成功",
        ))),
        Err(e) => Ok(internal_error("生成下载链接失败", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profiles::entities::UserRole;
    use crate::models::tutorials::entities::TutorialCategory;
    use crate::services::test_support::{TestContext, body_json};
    use crate::storage::sea_orm_storage::test_support::{
        seed_profile, seed_submission, seed_tutorial,
    };
    use actix_web::http::StatusCode;

    #[actix_web::test]
    async fn test_owner_and_staff_can_download() {
        let ctx = TestContext::new().await;
        let mia = seed_profile(&ctx.db, "mia@artclub.org", UserRole::Student).await;
        let leo = seed_profile(&ctx.db, "leo@artclub.org", UserRole::Student).await;
        let teacher = seed_profile(&ctx.db, "t@artclub.org", UserRole::Staff).await;
        let lesson = seed_tutorial(&ctx.db, "Value", TutorialCategory::Sketching).await;
        let submission = seed_submission(&ctx.db, mia.id, lesson.id).await;
        let service = SubmissionService::new_lazy();

        let resp = handle_download_submission(&service, &ctx.request_as(&mia), submission.id)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["data"]["expires_in"], 600);
        let url = body["data"]["signed_url"].as_str().unwrap();
        assert!(url.contains(&format!("/object/sign/homework/{}", submission.file_path)));

        let resp = handle_download_submission(&service, &ctx.request_as(&teacher), submission.id)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = handle_download_submission(&service, &ctx.request_as(&leo), submission.id)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = handle_download_submission(&service, &ctx.request_as(&mia), 9999)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
