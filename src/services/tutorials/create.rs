use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TutorialService;
use crate::models::tutorials::entities::TutorialCategory;
use crate::models::tutorials::requests::CreateTutorial;
use crate::models::{ApiResponse, ErrorCode};
use crate::object_store::{Bucket, sanitize_file_name};
use crate::services::{get_object_store, internal_error};
use crate::utils::multipart::{UploadRules, read_upload_form};
use crate::utils::validate::validate_title;

/// 教程视频对象路径：时间戳前缀避免重名
fn tutorial_video_path(now_millis: i64, original_name: &str) -> String {
    format!("{now_millis}-{}", sanitize_file_name(original_name))
}

/// 上传教程视频并登记教程（管理员/老师）
pub async fn handle_create_tutorial(
    service: &TutorialService,
    request: &HttpRequest,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let config = service.get_config();
    let rules = UploadRules {
        file_field: "video",
        allowed_extensions: &config.upload.video_types,
        max_size: config.upload.video_max_size,
    };
    let form = match read_upload_form(payload, &rules).await {
        Ok(form) => form,
        Err(rejection) => return Ok(rejection.into_response()),
    };

    let title = form.text("title").unwrap_or_default().to_string();
    if let Err(msg) = validate_title(&title) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            msg,
        )));
    }
    let category = match form
        .text("category")
        .map(str::parse::<TutorialCategory>)
    {
        Some(Ok(category)) => category,
        Some(Err(msg)) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::TutorialCategoryInvalid,
                msg,
            )));
        }
        None => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::TutorialCategoryInvalid,
                "Category is required",
            )));
        }
    };
    let Some(video) = form.file else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::FileUploadFailed,
            "No video uploaded",
        )));
    };

    let objects = get_object_store(request);
    let path = tutorial_video_path(chrono::Utc::now().timestamp_millis(), &video.original_name);
    if let Err(e) = objects.put(Bucket::Tutorials, &path, &video.data, false).await {
        tracing::error!("Failed to store tutorial video {}: {}", path, e);
        return Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
            ErrorCode::FileUploadFailed,
            "Failed to store video",
        )));
    }

    let created = service
        .get_storage(request)
        .create_tutorial(CreateTutorial {
            title: title.trim().to_string(),
            category,
            video_url: objects.public_url(Bucket::Tutorials, &path),
        })
        .await;

    match created {
        Ok(tutorial) => {
            tracing::info!("Tutorial {} uploaded to {}", tutorial.id, path);
            Ok(HttpResponse::Created().json(ApiResponse::success(tutorial, "Tutorial uploaded")))
        }
        Err(e) => {
            // 登记失败时删除已上传的视频
            if let Err(remove_err) = objects.remove(Bucket::Tutorials, &[path]).await {
                tracing::warn!("Failed to remove orphaned tutorial video: {}", remove_err);
            }
            Ok(internal_error("创建教程失败", e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{MP4_BYTES, PNG_BYTES, TestContext, body_json, multipart_payload};
    use actix_web::http::StatusCode;

    #[test]
    fn test_video_path_is_sanitised() {
        assert_eq!(
            tutorial_video_path(1700000000000, "My Shading Class!.mp4"),
            "1700000000000-My-Shading-Class-.mp4"
        );
    }

    #[actix_web::test]
    async fn test_create_tutorial() {
        let ctx = TestContext::new().await;
        let resp = handle_create_tutorial(
            &TutorialService::new_lazy(),
            &ctx.request(),
            multipart_payload(
                &[("title", " Color Wheel "), ("category", "color")],
                Some(("video", "wheel.mp4", MP4_BYTES)),
            ),
        )
        .await
        .unwrap();

        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = body_json(resp).await;
        assert_eq!(body["data"]["title"], "Color Wheel");
        assert_eq!(body["data"]["category"], "Color");
        assert_eq!(body["data"]["order_index"], 0);

        let url = body["data"]["video_url"].as_str().unwrap();
        let path = ctx
            .objects
            .path_from_public_url(Bucket::Tutorials, url)
            .unwrap();
        assert!(path.ends_with("-wheel.mp4"));
        let stored = ctx.objects.open(Bucket::Tutorials, &path).await.unwrap();
        assert_eq!(stored.as_deref(), Some(MP4_BYTES));
    }

    #[actix_web::test]
    async fn test_rejects_bad_category_and_non_video() {
        let ctx = TestContext::new().await;
        let service = TutorialService::new_lazy();

        let resp = handle_create_tutorial(
            &service,
            &ctx.request(),
            multipart_payload(
                &[("title", "Ink"), ("category", "Pottery")],
                Some(("video", "ink.mp4", MP4_BYTES)),
            ),
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(resp).await["code"],
            ErrorCode::TutorialCategoryInvalid as i32
        );

        let resp = handle_create_tutorial(
            &service,
            &ctx.request(),
            multipart_payload(
                &[("title", "Ink"), ("category", "Sketching")],
                Some(("video", "ink.png", PNG_BYTES)),
            ),
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(resp).await["code"],
            ErrorCode::FileTypeNotAllowed as i32
        );
    }
}
