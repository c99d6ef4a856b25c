use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::middlewares::RequireJWT;
use crate::models::realtime::{ChangeEvent, ChangeTable};
use crate::models::submissions::requests::CreateSubmission;
use crate::models::{ApiResponse, ErrorCode};
use crate::object_store::Bucket;
use crate::services::realtime::publish_owned_change;
use crate::services::{get_object_store, internal_error, unauthorized};
use crate::utils::multipart::{UploadRules, read_upload_form};

/// 作业对象路径：按学员分目录，文件名为毫秒时间戳
fn homework_path(user_id: i64, now_millis: i64, bare_extension: &str) -> String {
    format!("{user_id}/{now_millis}.{bare_extension}")
}

pub async fn handle_create_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };
    let config = service.get_config();
    let storage = service.get_storage(request);

    let rules = UploadRules {
        file_field: "file",
        allowed_extensions: &config.upload.allowed_types,
        max_size: config.upload.max_size,
    };
    let form = match read_upload_form(payload, &rules).await {
        Ok(form) => form,
        Err(rejection) => return Ok(rejection.into_response()),
    };

    let Some(lesson_id) = form.text("lesson_id").and_then(|v| v.parse::<i64>().ok()) else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "lesson_id is required",
        )));
    };
    let Some(file) = form.file else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::FileUploadFailed,
            "No file uploaded",
        )));
    };

    match storage.get_tutorial_by_id(lesson_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::TutorialNotFound,
                "Lesson not found",
            )));
        }
        Err(e) => return Ok(internal_error("查询课程失败", e)),
    }

    let objects = get_object_store(request);
    let path = homework_path(
        user_id,
        chrono::Utc::now().timestamp_millis(),
        file.bare_extension(),
    );
    if let Err(e) = objects.put(Bucket::Homework, &path, &file.data, false).await {
        tracing::error!("Failed to store homework {}: {}", path, e);
        return Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
            ErrorCode::FileUploadFailed,
            "Failed to store file",
        )));
    }

    let created = storage
        .create_submission(CreateSubmission {
            user_id,
            lesson_id,
            file_path: path.clone(),
        })
        .await;

    match created {
        Ok(submission) => {
            publish_owned_change(
                ChangeTable::Submissions,
                ChangeEvent::Insert,
                submission.id,
                user_id,
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                submission,
                "Homework submitted",
            )))
        }
        Err(e) => {
            if let Err(remove_err) = objects.remove(Bucket::Homework, &[path]).await {
                tracing::warn!("Failed to remove orphaned homework file: {}", remove_err);
            }
            Ok(internal_error("创建提交失败", e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profiles::entities::UserRole;
    use crate::models::tutorials::entities::TutorialCategory;
    use crate::services::test_support::{PDF_BYTES, TestContext, body_json, multipart_payload};
    use crate::storage::sea_orm_storage::test_support::{seed_profile, seed_tutorial};
    use actix_web::http::StatusCode;

    #[test]
    fn test_homework_path() {
        assert_eq!(homework_path(3, 1700000000123, "pdf"), "3/1700000000123.pdf");
    }

    #[actix_web::test]
    async fn test_submit_homework() {
        let ctx = TestContext::new().await;
        let mia = seed_profile(&ctx.db, "mia@artclub.org", UserRole::Student).await;
        let lesson = seed_tutorial(&ctx.db, "Hatching", TutorialCategory::Sketching).await;
        let lesson_id = lesson.id.to_string();

        let resp = handle_create_submission(
            &SubmissionService::new_lazy(),
            &ctx.request_as(&mia),
            multipart_payload(
                &[("lesson_id", &lesson_id)],
                Some(("file", "hatching.pdf", PDF_BYTES)),
            ),
        )
        .await
        .unwrap();

        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = body_json(resp).await;
        assert_eq!(body["data"]["lesson_id"], lesson.id);
        let path = body["data"]["file_path"].as_str().unwrap();
        assert!(path.starts_with(&format!("{}/", mia.id)));
        assert!(path.ends_with(".pdf"));
        let stored = ctx.objects.open(Bucket::Homework, path).await.unwrap();
        assert_eq!(stored.as_deref(), Some(PDF_BYTES));
    }

    #[actix_web::test]
    async fn test_unknown_lesson_rejected() {
        let ctx = TestContext::new().await;
        let mia = seed_profile(&ctx.db, "mia@artclub.org", UserRole::Student).await;

        let resp = handle_create_submission(
            &SubmissionService::new_lazy(),
            &ctx.request_as(&mia),
            multipart_payload(
                &[("lesson_id", "404")],
                Some(("file", "hatching.pdf", PDF_BYTES)),
            ),
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = handle_create_submission(
            &SubmissionService::new_lazy(),
            &ctx.request_as(&mia),
            multipart_payload(&[], Some(("file", "hatching.pdf", PDF_BYTES))),
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
