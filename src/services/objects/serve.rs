use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::header};

use super::SignedObjectQuery;
use crate::errors::ArtClubError;
use crate::models::{ApiResponse, ErrorCode};
use crate::object_store::{Bucket, validate_object_path};
use crate::services::{forbidden, get_object_store};
use crate::utils::file_magic::content_type_for_extension;
use crate::utils::multipart::extension_of;

fn object_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(ErrorCode::FileNotFound, "Object not found"))
}

fn parse_target(bucket: &str, path: &str) -> Result<Bucket, HttpResponse> {
    let bucket = bucket.parse::<Bucket>().map_err(|_| object_not_found())?;
    validate_object_path(path).map_err(|e| {
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, e.message()))
    })?;
    Ok(bucket)
}

async fn read_object(request: &HttpRequest, bucket: Bucket, path: &str, cache_control: &str) -> HttpResponse {
    match get_object_store(request).open(bucket, path).await {
        Ok(Some(data)) => HttpResponse::Ok()
            .insert_header((header::CONTENT_TYPE, content_type_for_extension(&extension_of(path))))
            .insert_header((header::CACHE_CONTROL, cache_control.to_string()))
            .body(data),
        Ok(None) => object_not_found(),
        Err(e) => {
            tracing::error!("{:?}", ArtClubError::object_store(format!("读取 {bucket}/{path} 失败: {e}")));
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                "Failed to read object",
            ))
        }
    }
}

pub async fn handle_serve_public(
    request: &HttpRequest,
    bucket: &str,
    path: &str,
) -> ActixResult<HttpResponse> {
    let bucket = match parse_target(bucket, path) {
        Ok(bucket) => bucket,
        Err(resp) => return Ok(resp),
    };
    // 私有 bucket 不暴露是否存在
    if !bucket.is_public() {
        return Ok(object_not_found());
    }
    Ok(read_object(request, bucket, path, "public, max-age=3600").await)
}

pub async fn handle_serve_signed(
    request: &HttpRequest,
    bucket: &str,
    path: &str,
    query: SignedObjectQuery,
) -> ActixResult<HttpResponse> {
    let bucket = match parse_target(bucket, path) {
        Ok(bucket) => bucket,
        Err(resp) => return Ok(resp),
    };
    let Some(token) = query.token.filter(|t| !t.is_empty()) else {
        return Ok(forbidden("Missing signature token"));
    };
    if !get_object_store(request).verify_signature(bucket, path, &token) {
        return Ok(forbidden("Invalid or expired signature"));
    }
    Ok(read_object(request, bucket, path, "private, no-store").await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{PDF_BYTES, PNG_BYTES, TestContext};
    use actix_web::http::StatusCode;

    #[actix_web::test]
    async fn test_public_bucket_served() {
        let ctx = TestContext::new().await;
        ctx.objects
            .put(Bucket::Avatars, "7/avatar.png", PNG_BYTES, true)
            .await
            .unwrap();

        let resp = handle_serve_public(&ctx.request(), "avatars", "7/avatar.png")
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "image/png"
        );
        let body = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
        assert_eq!(&body[..], PNG_BYTES);

        let resp = handle_serve_public(&ctx.request(), "avatars", "7/missing.png")
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = handle_serve_public(&ctx.request(), "avatars", "../secret")
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_homework_needs_signature() {
        let ctx = TestContext::new().await;
        ctx.objects
            .put(Bucket::Homework, "3/1.pdf", PDF_BYTES, false)
            .await
            .unwrap();

        let resp = handle_serve_public(&ctx.request(), "homework", "3/1.pdf")
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let signed = ctx
            .objects
            .signed_url(Bucket::Homework, "3/1.pdf", chrono::Duration::seconds(60))
            .unwrap();
        let token = signed.split("token=").nth(1).unwrap().to_string();

        let resp = handle_serve_signed(
            &ctx.request(),
            "homework",
            "3/1.pdf",
            SignedObjectQuery {
                token: Some(token.clone()),
            },
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        // token 绑定路径，换路径无效
        let resp = handle_serve_signed(
            &ctx.request(),
            "homework",
            "3/2.pdf",
            SignedObjectQuery { token: Some(token) },
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = handle_serve_signed(
            &ctx.request(),
            "homework",
            "3/1.pdf",
            SignedObjectQuery { token: None },
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }
}
