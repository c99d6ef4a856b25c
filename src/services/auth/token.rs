use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::require_jwt::RequireJWT;
use crate::models::auth::responses::{RefreshTokenResponse, TokenVerificationResponse};
use crate::models::profiles::responses::ProfileResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::jwt;

use super::AuthService;

pub async fn handle_refresh_token(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let config = service.get_config();
    let Some(refresh_token) = jwt::JwtUtils::extract_refresh_token_from_cookie(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    match jwt::JwtUtils::refresh_access_token(&refresh_token) {
        Ok(new_access_token) => {
            let response = RefreshTokenResponse {
                access_token: new_access_token,
                expires_in: config.jwt.access_token_expiry * 60,
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                response,
                "Token refreshed successfully",
            )))
        }
        Err(e) => {
            tracing::info!("Refresh token rejected: {}", e);
            Ok(HttpResponse::Unauthorized()
                .cookie(jwt::JwtUtils::create_empty_refresh_token_cookie())
                .json(ApiResponse::error_empty(
                    ErrorCode::Unauthorized,
                    "Login expired or invalid, please login again",
                )))
        }
    }
}

/// RequireJWT 已经校验过 token，能走到这里就是有效的
pub async fn handle_verify_token(
    _service: &AuthService,
    _request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        TokenVerificationResponse { is_valid: true },
        "Token is valid",
    )))
}

/// 当前用户资料和权限
pub async fn handle_get_me(
    _service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    match RequireJWT::extract_profile(request) {
        Some(profile) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ProfileResponse::from(profile),
            "User information retrieved successfully",
        ))),
        None => Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profiles::entities::UserRole;
    use crate::services::test_support::{TestContext, body_json};
    use crate::storage::sea_orm_storage::test_support::seed_profile;
    use crate::utils::jwt::JwtUtils;
    use actix_web::http::StatusCode;

    #[actix_web::test]
    async fn test_refresh_with_cookie() {
        let ctx = TestContext::new().await;
        let service = AuthService::new_lazy();

        let refresh = JwtUtils::generate_refresh_token(3, "staff", None).unwrap();
        let resp = handle_refresh_token(&service, &ctx.request_with_cookie("refresh_token", &refresh))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        let access = body["data"]["access_token"].as_str().unwrap();
        let claims = JwtUtils::verify_access_token(access).unwrap();
        assert_eq!(claims.sub, "3");
        assert_eq!(claims.role, "staff");
    }

    #[actix_web::test]
    async fn test_refresh_rejects_access_token_and_missing_cookie() {
        let ctx = TestContext::new().await;
        let service = AuthService::new_lazy();

        let resp = handle_refresh_token(&service, &ctx.request()).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let access = JwtUtils::generate_access_token(3, "staff").unwrap();
        let resp = handle_refresh_token(&service, &ctx.request_with_cookie("refresh_token", &access))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        // 清掉无效 cookie
        assert!(resp.cookies().any(|c| c.name() == "refresh_token" && c.value().is_empty()));
    }

    #[actix_web::test]
    async fn test_me_returns_permissions() {
        let ctx = TestContext::new().await;
        let staff = seed_profile(&ctx.db, "t@artclub.org", UserRole::Staff).await;

        let resp = handle_get_me(&AuthService::new_lazy(), &ctx.request_as(&staff))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["data"]["profile"]["email"], "t@artclub.org");
        assert_eq!(body["data"]["permissions"]["can_grade"], true);
        assert_eq!(body["data"]["permissions"]["can_manage_users"], false);
    }
}
