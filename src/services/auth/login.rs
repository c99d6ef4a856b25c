use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::{ApiResponse, ErrorCode, auth::requests::LoginRequest};
use crate::utils::password::verify_password;

use super::{AuthService, issue_session, normalize_email};

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let config = service.get_config();
    let email = normalize_email(&login_request.email);

    // 账号不存在和密码错误返回相同信息
    let profile = match storage.get_profile_by_email(&email).await {
        Ok(Some(profile)) if verify_password(&login_request.password, &profile.password_hash) => {
            profile
        }
        Ok(_) => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::AuthFailed,
                "Email or password is incorrect",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Login failed: {e}"),
                )),
            );
        }
    };

    if let Err(e) = storage.update_last_login(profile.id).await {
        tracing::warn!("Failed to update last login for {}: {}", profile.id, e);
    }

    match issue_session(config, profile, login_request.remember_me) {
        Ok((response, cookie)) => {
            tracing::info!("User {} logged in successfully", response.profile.email);
            Ok(HttpResponse::Ok()
                .cookie(cookie)
                .json(ApiResponse::success(response, "Login successful")))
        }
        Err(resp) => Ok(resp),
    }
}
