//! 魔法链接回调
//!
//! `POST /api/v1/auth/callback` 供前端以 JSON 兑换登录码；
//! `GET /auth/callback` 是邮件里的链接直接打开的页面，成功后跳转到 `/profile`，
//! 失败时返回错误信息并通过 `Refresh` 头延迟跳回 `/login`。

use actix_web::http::header::{LOCATION, REFRESH};
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::auth::requests::{CallbackQuery, CodeExchangeRequest};
use crate::models::auth::responses::LoginResponse;
use crate::models::{ApiResponse, ErrorCode};

use super::{AuthService, issue_session};

const PROFILE_PAGE: &str = "/profile";
const LOGIN_PAGE: &str = "/login";

/// 兑换失败的原因
enum ExchangeError {
    Invalid,
    Internal(HttpResponse),
}

async fn exchange(
    service: &AuthService,
    code: &str,
    request: &HttpRequest,
) -> Result<(LoginResponse, actix_web::cookie::Cookie<'static>), ExchangeError> {
    let storage = service.get_storage(request);
    let code = code.trim();
    if code.is_empty() {
        return Err(ExchangeError::Invalid);
    }

    let auth_code = match storage.consume_auth_code(code, chrono::Utc::now()).await {
        Ok(Some(auth_code)) => auth_code,
        Ok(None) => return Err(ExchangeError::Invalid),
        Err(e) => {
            return Err(ExchangeError::Internal(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Code exchange failed: {e}"),
                )),
            ));
        }
    };

    let profile = match storage.get_profile_by_id(auth_code.user_id).await {
        Ok(Some(profile)) => profile,
        Ok(None) => return Err(ExchangeError::Invalid),
        Err(e) => {
            return Err(ExchangeError::Internal(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Code exchange failed: {e}"),
                )),
            ));
        }
    };

    if let Err(e) = storage.update_last_login(profile.id).await {
        tracing::warn!("Failed to update last login for {}: {}", profile.id, e);
    }
    tracing::info!("User {} signed in with magic link", profile.email);

    issue_session(service.get_config(), profile, false).map_err(ExchangeError::Internal)
}

pub async fn handle_code_exchange(
    service: &AuthService,
    exchange_request: CodeExchangeRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    match exchange(service, &exchange_request.code, request).await {
        Ok((response, cookie)) => Ok(HttpResponse::Ok()
            .cookie(cookie)
            .json(ApiResponse::success(response, "Login successful"))),
        Err(ExchangeError::Invalid) => Ok(HttpResponse::Unauthorized().json(
            ApiResponse::error_empty(ErrorCode::AuthCodeInvalid, "Invalid or expired code"),
        )),
        Err(ExchangeError::Internal(resp)) => Ok(resp),
    }
}

/// 错误页：带上错误信息，延迟后跳转登录页
fn failure_page(delay_secs: u64, message: &str) -> HttpResponse {
    HttpResponse::Unauthorized()
        .insert_header((REFRESH, format!("{delay_secs}; url={LOGIN_PAGE}")))
        .json(ApiResponse::error_empty(ErrorCode::AuthFailed, message))
}

pub async fn handle_browser_callback(
    service: &AuthService,
    query: CallbackQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let delay = service.get_config().auth.callback_redirect_delay;

    if let Some(error) = query.error.filter(|e| !e.is_empty()) {
        let message = query
            .error_description
            .filter(|d| !d.is_empty())
            .unwrap_or(error);
        tracing::info!("Auth callback returned error: {}", message);
        return Ok(failure_page(delay, &message));
    }

    let Some(code) = query.code.filter(|c| !c.is_empty()) else {
        return Ok(HttpResponse::Found()
            .insert_header((LOCATION, LOGIN_PAGE))
            .finish());
    };

    match exchange(service, &code, request).await {
        Ok((_, cookie)) => Ok(HttpResponse::Found()
            .cookie(cookie)
            .insert_header((LOCATION, PROFILE_PAGE))
            .finish()),
        Err(ExchangeError::Invalid) => Ok(failure_page(delay, "Invalid or expired code")),
        Err(ExchangeError::Internal(_)) => Ok(failure_page(delay, "Sign-in failed, please try again")),
    }
}
