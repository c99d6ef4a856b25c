use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::PosterService;
use super::create::poster_path;
use crate::models::posters::requests::UpdatePosterRequest;
use crate::models::realtime::{ChangeEvent, ChangeTable};
use crate::models::{ApiResponse, ErrorCode};
use crate::object_store::Bucket;
use crate::services::realtime::publish_public_change;
use crate::services::{get_object_store, internal_error};
use crate::utils::multipart::{UploadRules, read_upload_form};
use crate::utils::validate::validate_title;

fn poster_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::PosterNotFound,
        "Poster not found",
    ))
}

pub async fn handle_update_poster(
    service: &PosterService,
    request: &HttpRequest,
    poster_id: i64,
    mut update: UpdatePosterRequest,
) -> ActixResult<HttpResponse> {
    if let Some(title) = update.title.as_deref() {
        if let Err(msg) = validate_title(title) {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                msg,
            )));
        }
    }
    update.title = update.title.map(|t| t.trim().to_string());

    match service
        .get_storage(request)
        .update_poster(poster_id, update)
        .await
    {
        Ok(Some(poster)) => {
            publish_public_change(ChangeTable::Posters, ChangeEvent::Update, poster.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(poster, "Poster updated")))
        }
        Ok(None) => Ok(poster_not_found()),
        Err(e) => Ok(internal_error("更新海报失败", e)),
    }
}

/// 更换海报图片：先传新图，更新链接后再删旧图
pub async fn handle_replace_image(
    service: &PosterService,
    request: &HttpRequest,
    poster_id: i64,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let config = service.get_config();
    let storage = service.get_storage(request);
    let objects = get_object_store(request);

    let current = match storage.get_poster_by_id(poster_id).await {
        Ok(Some(poster)) => poster,
        Ok(None) => return Ok(poster_not_found()),
        Err(e) => return Ok(internal_error("获取海报失败", e)),
    };

    let rules = UploadRules {
        file_field: "image",
        allowed_extensions: &config.upload.image_types,
        max_size: config.upload.max_size,
    };
    let form = match read_upload_form(payload, &rules).await {
        Ok(form) => form,
        Err(rejection) => return Ok(rejection.into_response()),
    };
    let Some(image) = form.file else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::FileUploadFailed,
            "No image uploaded",
        )));
    };

    let path = poster_path(chrono::Utc::now().timestamp_millis(), &image);
    if let Err(e) = objects.put(Bucket::Posters, &path, &image.data, false).await {
        tracing::error!("Failed to store poster image {}: {}", path, e);
        return Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
            ErrorCode::FileUploadFailed,
            "Failed to store image",
        )));
    }

    let image_url = objects.public_url(Bucket::Posters, &path);
    match storage.update_poster_image(poster_id, &image_url).await {
        Ok(Some(poster)) => {
            let old_path = objects
                .path_from_public_url(Bucket::Posters, &current.image_url)
                .filter(|old| *old != path);
            if let Some(old_path) = old_path {
                if let Err(e) = objects.remove(Bucket::Posters, &[old_path]).await {
                    tracing::warn!("Failed to remove old poster image of {}: {}", poster_id, e);
                }
            }
            publish_public_change(ChangeTable::Posters, ChangeEvent::Update, poster.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(poster, "Poster image updated")))
        }
        Ok(None) => {
            let _ = objects.remove(Bucket::Posters, &[path]).await;
            Ok(poster_not_found())
        }
        Err(e) => {
            let _ = objects.remove(Bucket::Posters, &[path]).await;
            Ok(internal_error("更新海报图片失败", e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::posters::requests::CreatePoster;
    use crate::services::test_support::{PNG_BYTES, TestContext, body_json, multipart_payload};
    use actix_web::http::StatusCode;

    #[actix_web::test]
    async fn test_update_and_deactivate() {
        let ctx = TestContext::new().await;
        let poster = ctx
            .storage
            .create_poster(CreatePoster {
                title: "Gallery Night".into(),
                description: String::new(),
                image_url: "http://club.test/storage/v1/object/public/posters/1.png".into(),
            })
            .await
            .unwrap();
        let service = PosterService::new_lazy();

        let resp = handle_update_poster(
            &service,
            &ctx.request(),
            poster.id,
            UpdatePosterRequest {
                title: Some(" Gallery Night 2 ".into()),
                description: None,
                is_active: Some(false),
            },
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["data"]["title"], "Gallery Night 2");
        assert_eq!(body["data"]["is_active"], false);

        let active = ctx.storage.list_posters(true).await.unwrap();
        assert!(active.is_empty());

        let resp = handle_update_poster(
            &service,
            &ctx.request(),
            poster.id + 1,
            UpdatePosterRequest::default(),
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_replace_image_removes_old_object() {
        let ctx = TestContext::new().await;
        ctx.objects
            .put(Bucket::Posters, "1.png", PNG_BYTES, false)
            .await
            .unwrap();
        let poster = ctx
            .storage
            .create_poster(CreatePoster {
                title: "Clay Day".into(),
                description: String::new(),
                image_url: ctx.objects.public_url(Bucket::Posters, "1.png"),
            })
            .await
            .unwrap();

        let resp = handle_replace_image(
            &PosterService::new_lazy(),
            &ctx.request(),
            poster.id,
            multipart_payload(&[], Some(("image", "clay.png", PNG_BYTES))),
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_ne!(
            body["data"]["image_url"].as_str().unwrap(),
            poster.image_url.as_str()
        );
        assert!(ctx.objects.open(Bucket::Posters, "1.png").await.unwrap().is_none());
    }
}
