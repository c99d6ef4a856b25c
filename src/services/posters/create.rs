use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::PosterService;
use crate::models::posters::requests::CreatePoster;
use crate::models::realtime::{ChangeEvent, ChangeTable};
use crate::models::{ApiResponse, ErrorCode};
use crate::object_store::Bucket;
use crate::services::realtime::publish_public_change;
use crate::services::{get_object_store, internal_error};
use crate::utils::multipart::{UploadRules, UploadedFile, read_upload_form};
use crate::utils::validate::validate_title;

/// 海报对象路径
pub(super) fn poster_path(now_millis: i64, file: &UploadedFile) -> String {
    format!("{now_millis}.{}", file.bare_extension())
}

pub async fn handle_create_poster(
    service: &PosterService,
    request: &HttpRequest,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let config = service.get_config();
    let rules = UploadRules {
        file_field: "image",
        allowed_extensions: &config.upload.image_types,
        max_size: config.upload.max_size,
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
    let description = form.text("description").unwrap_or_default().to_string();
    let Some(image) = form.file else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::FileUploadFailed,
            "No image uploaded",
        )));
    };

    let objects = get_object_store(request);
    let path = poster_path(chrono::Utc::now().timestamp_millis(), &image);
    if let Err(e) = objects.put(Bucket::Posters, &path, &image.data, false).await {
        tracing::error!("Failed to store poster image {}: {}", path, e);
        return Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
            ErrorCode::FileUploadFailed,
            "Failed to store image",
        )));
    }

    let created = service
        .get_storage(request)
        .create_poster(CreatePoster {
            title,
            description,
            image_url: objects.public_url(Bucket::Posters, &path),
        })
        .await;

    match created {
        Ok(poster) => {
            publish_public_change(ChangeTable::Posters, ChangeEvent::Insert, poster.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(poster, "Poster created")))
        }
        Err(e) => {
            if let Err(remove_err) = objects.remove(Bucket::Posters, &[path]).await {
                tracing::warn!("Failed to remove orphaned poster image: {}", remove_err);
            }
            Ok(internal_error("创建海报失败", e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{PNG_BYTES, TestContext, body_json, multipart_payload};
    use actix_web::http::StatusCode;

    #[actix_web::test]
    async fn test_create_poster() {
        let ctx = TestContext::new().await;
        let resp = handle_create_poster(
            &PosterService::new_lazy(),
            &ctx.request(),
            multipart_payload(
                &[("title", "Open Studio"), ("description", "Friday 5pm")],
                Some(("image", "studio.png", PNG_BYTES)),
            ),
        )
        .await
        .unwrap();

        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = body_json(resp).await;
        assert_eq!(body["data"]["is_active"], true);
        assert_eq!(body["data"]["description"], "Friday 5pm");
        let url = body["data"]["image_url"].as_str().unwrap();
        assert!(url.ends_with(".png"));
        let path = ctx.objects.path_from_public_url(Bucket::Posters, url).unwrap();
        assert!(ctx.objects.open(Bucket::Posters, &path).await.unwrap().is_some());
    }

    #[actix_web::test]
    async fn test_missing_title() {
        let ctx = TestContext::new().await;
        let resp = handle_create_poster(
            &PosterService::new_lazy(),
            &ctx.request(),
            multipart_payload(&[], Some(("image", "studio.png", PNG_BYTES))),
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
