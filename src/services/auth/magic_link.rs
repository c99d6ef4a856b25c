use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{Duration, Utc};

use crate::models::{ApiResponse, ErrorCode, auth::requests::MagicLinkRequest};
use crate::utils::random_code::generate_code;
use crate::utils::validate::validate_email;

use super::{AuthService, normalize_email};

pub const AUTH_CODE_LENGTH: usize = 48;

/// 生成魔法链接
///
/// 不发邮件，链接写入日志。无论邮箱是否注册都返回相同的成功响应。
pub async fn handle_magic_link(
    service: &AuthService,
    magic_request: MagicLinkRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let config = service.get_config();

    let email = normalize_email(&magic_request.email);
    if let Err(msg) = validate_email(&email) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserEmailInvalid, msg)));
    }

    let accepted = HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
        "If this email is registered, a sign-in link has been sent",
    ));

    let profile = match storage.get_profile_by_email(&email).await {
        Ok(Some(profile)) => profile,
        Ok(None) => {
            tracing::debug!("Magic link requested for unknown email");
            return Ok(accepted);
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to send magic link: {e}"),
                )),
            );
        }
    };

    let code = generate_code(AUTH_CODE_LENGTH);
    let expires_at = Utc::now() + Duration::minutes(config.auth.magic_link_ttl);
    if let Err(e) = storage.create_auth_code(profile.id, &code, expires_at).await {
        return Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to send magic link: {e}"),
            )),
        );
    }

    tracing::info!(
        "Magic link for {}: {}/auth/callback?code={} (expires {})",
        profile.email,
        config.app.public_url,
        code,
        expires_at.to_rfc3339()
    );

    Ok(accepted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profiles::entities::UserRole;
    use crate::services::test_support::TestContext;
    use crate::storage::sea_orm_storage::test_support::seed_profile;
    use actix_web::http::StatusCode;

    #[actix_web::test]
    async fn test_unknown_email_gets_same_answer() {
        let ctx = TestContext::new().await;
        seed_profile(&ctx.db, "mia@artclub.org", UserRole::Student).await;
        let service = AuthService::new_lazy();

        let known = handle_magic_link(
            &service,
            MagicLinkRequest {
                email: "mia@artclub.org".to_string(),
            },
            &ctx.request(),
        )
        .await
        .unwrap();
        let unknown = handle_magic_link(
            &service,
            MagicLinkRequest {
                email: "nobody@artclub.org".to_string(),
            },
            &ctx.request(),
        )
        .await
        .unwrap();

        assert_eq!(known.status(), StatusCode::OK);
        assert_eq!(unknown.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_invalid_email_rejected() {
        let ctx = TestContext::new().await;
        let resp = handle_magic_link(
            &AuthService::new_lazy(),
            MagicLinkRequest {
                email: "not-an-email".to_string(),
            },
            &ctx.request(),
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
