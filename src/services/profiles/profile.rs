use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ProfileService;
use crate::middlewares::RequireJWT;
use crate::middlewares::require_jwt::invalidate_profile;
use crate::models::profiles::requests::UpdateProfileRequest;
use crate::models::profiles::responses::ProfileResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{get_cache, internal_error, unauthorized};
use crate::utils::validate::validate_full_name;

/// 从数据库读取最新资料，避免返回缓存中的旧数据
pub async fn handle_get_profile(
    service: &ProfileService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    match service.get_storage(request).get_profile_by_id(user_id).await {
        Ok(Some(profile)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ProfileResponse::from(profile),
            "获取成功",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(e) => Ok(internal_error("获取用户资料失败", e)),
    }
}

pub async fn handle_update_profile(
    service: &ProfileService,
    request: &HttpRequest,
    update: UpdateProfileRequest,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    // 空白姓名视为清空
    let full_name = update
        .full_name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());
    if let Some(name) = &full_name
        && let Err(msg) = validate_full_name(name)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserNameInvalid, msg)));
    }

    match service
        .get_storage(request)
        .update_profile_name(user_id, full_name)
        .await
    {
        Ok(Some(profile)) => {
            invalidate_profile(get_cache(request).as_ref(), user_id).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                ProfileResponse::from(profile),
                "Profile updated",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(e) => Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
            ErrorCode::UserUpdateFailed,
            format!("更新用户资料失败: {e}"),
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{get_json, insert_json};
    use crate::middlewares::require_jwt::profile_cache_key;
    use crate::models::profiles::entities::{Profile, UserRole};
    use crate::services::test_support::{TestContext, body_json};
    use crate::storage::sea_orm_storage::test_support::seed_profile;
    use actix_web::http::StatusCode;

    #[actix_web::test]
    async fn test_update_name_invalidates_cache() {
        let ctx = TestContext::new().await;
        let mia = seed_profile(&ctx.db, "mia@artclub.org", UserRole::Student).await;
        let key = profile_cache_key(mia.id);
        insert_json(ctx.cache.as_ref(), &key, &mia, 0).await;

        let resp = handle_update_profile(
            &ProfileService::new_lazy(),
            &ctx.request_as(&mia),
            UpdateProfileRequest {
                full_name: Some("  Mia Wong ".to_string()),
            },
        )
        .await
        .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["data"]["profile"]["full_name"], "Mia Wong");
        assert!(get_json::<Profile>(ctx.cache.as_ref(), &key).await.is_none());
    }

    #[actix_web::test]
    async fn test_update_rejects_long_name() {
        let ctx = TestContext::new().await;
        let mia = seed_profile(&ctx.db, "mia@artclub.org", UserRole::Student).await;

        let resp = handle_update_profile(
            &ProfileService::new_lazy(),
            &ctx.request_as(&mia),
            UpdateProfileRequest {
                full_name: Some("x".repeat(80)),
            },
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_get_requires_login() {
        let ctx = TestContext::new().await;
        let resp = handle_get_profile(&ProfileService::new_lazy(), &ctx.request())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
