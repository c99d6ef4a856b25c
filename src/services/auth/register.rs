use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::errors::ArtClubError;
use crate::models::profiles::entities::UserRole;
use crate::models::profiles::requests::CreateProfile;
use crate::models::{ApiResponse, ErrorCode, auth::requests::RegisterRequest};
use crate::utils::password::hash_password;
use crate::utils::validate::{validate_email, validate_full_name, validate_password_simple};

use super::{AuthService, issue_session, normalize_email};

pub async fn handle_register(
    service: &AuthService,
    register_request: RegisterRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let config = service.get_config();

    let email = normalize_email(&register_request.email);
    if let Err(msg) = validate_email(&email) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserEmailInvalid, msg)));
    }

    if let Err(msg) = validate_password_simple(&register_request.password) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserPasswordInvalid, msg)));
    }

    let full_name = register_request
        .full_name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());
    if let Some(name) = &full_name
        && let Err(msg) = validate_full_name(name)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserNameInvalid, msg)));
    }

    match storage.get_profile_by_email(&email).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::UserEmailAlreadyExists,
                "Email already exists",
            )));
        }
        Ok(None) => {}
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::RegisterFailed,
                    format!("Register failed: {e}"),
                )),
            );
        }
    }

    let password_hash = match hash_password(&register_request.password) {
        Ok(hash) => hash,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::RegisterFailed,
                    format!("密码哈希失败: {e}"),
                )),
            );
        }
    };

    // 新用户一律为学员
    let profile = match storage
        .create_profile(CreateProfile {
            email,
            password_hash,
            full_name,
            role: UserRole::Student,
        })
        .await
    {
        Ok(profile) => profile,
        // 并发注册同一邮箱时由唯一索引兜底
        Err(ArtClubError::Conflict(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::UserEmailAlreadyExists,
                "Email already exists",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::RegisterFailed,
                    format!("注册失败: {e}"),
                )),
            );
        }
    };

    tracing::info!("New student registered: {}", profile.email);
    match issue_session(config, profile, false) {
        Ok((response, cookie)) => Ok(HttpResponse::Created()
            .cookie(cookie)
            .json(ApiResponse::success(response, "注册成功"))),
        Err(resp) => Ok(resp),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{TestContext, body_json};
    use actix_web::http::StatusCode;

    fn request(email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            full_name: Some("  Leo  ".to_string()),
        }
    }

    #[actix_web::test]
    async fn test_register_creates_student() {
        let ctx = TestContext::new().await;
        let resp = handle_register(
            &AuthService::new_lazy(),
            request("Leo@ArtClub.org", "charcoal2024"),
            &ctx.request(),
        )
        .await
        .unwrap();

        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = body_json(resp).await;
        assert_eq!(body["data"]["profile"]["email"], "leo@artclub.org");
        assert_eq!(body["data"]["profile"]["full_name"], "Leo");
        assert_eq!(body["data"]["profile"]["role"], "student");
        assert!(body["data"]["profile"].get("password_hash").is_none());
    }

    #[actix_web::test]
    async fn test_register_rejects_duplicates_and_bad_input() {
        let ctx = TestContext::new().await;
        let service = AuthService::new_lazy();

        let first = handle_register(&service, request("leo@artclub.org", "charcoal2024"), &ctx.request())
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::CREATED);

        let dup = handle_register(&service, request("LEO@artclub.org", "charcoal2024"), &ctx.request())
            .await
            .unwrap();
        assert_eq!(dup.status(), StatusCode::CONFLICT);

        let bad_email = handle_register(&service, request("leo-at-club", "charcoal2024"), &ctx.request())
            .await
            .unwrap();
        assert_eq!(bad_email.status(), StatusCode::BAD_REQUEST);

        let weak = handle_register(&service, request("ana@artclub.org", "short"), &ctx.request())
            .await
            .unwrap();
        assert_eq!(weak.status(), StatusCode::BAD_REQUEST);
        let body = body_json(weak).await;
        assert_eq!(body["code"], ErrorCode::UserPasswordInvalid as i32);
    }
}
