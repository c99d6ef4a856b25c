pub mod callback;
pub mod login;
pub mod logout;
pub mod magic_link;
pub mod register;
pub mod token;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::auth::requests::{
    CallbackQuery, CodeExchangeRequest, LoginRequest, MagicLinkRequest, RegisterRequest,
};
use crate::models::auth::responses::LoginResponse;
use crate::models::profiles::entities::Profile;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;

pub struct AuthService {
    storage: Option<Arc<dyn Storage>>,
}

impl AuthService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    // 密码登录
    pub async fn login(
        &self,
        login_request: LoginRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        login::handle_login(self, login_request, request).await
    }

    // 注册
    pub async fn register(
        &self,
        register_request: RegisterRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        register::handle_register(self, register_request, request).await
    }

    // 发送魔法链接
    pub async fn magic_link(
        &self,
        magic_request: MagicLinkRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        magic_link::handle_magic_link(self, magic_request, request).await
    }

    // 登录码换会话（JSON）
    pub async fn exchange_code(
        &self,
        exchange_request: CodeExchangeRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        callback::handle_code_exchange(self, exchange_request, request).await
    }

    // 浏览器回调
    pub async fn browser_callback(
        &self,
        query: CallbackQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        callback::handle_browser_callback(self, query, request).await
    }

    pub async fn refresh_token(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        token::handle_refresh_token(self, request).await
    }

    pub async fn verify_token(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        token::handle_verify_token(self, request).await
    }

    pub async fn get_me(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        token::handle_get_me(self, request).await
    }

    pub async fn logout(&self) -> ActixResult<HttpResponse> {
        logout::handle_logout().await
    }
}

/// 为用户签发会话：access token 放在响应体，refresh token 写入 cookie
pub(crate) fn issue_session(
    config: &AppConfig,
    profile: Profile,
    remember_me: bool,
) -> Result<(LoginResponse, actix_web::cookie::Cookie<'static>), HttpResponse> {
    let refresh_days = if remember_me {
        config.jwt.refresh_token_remember_me_expiry
    } else {
        config.jwt.refresh_token_expiry
    };

    let token_pair = profile
        .generate_token_pair(Some(chrono::Duration::days(refresh_days)))
        .map_err(|e| {
            tracing::error!("Failed to generate JWT token: {}", e);
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                "Login failed, unable to generate token",
            ))
        })?;

    let cookie = JwtUtils::create_refresh_token_cookie(&token_pair.refresh_token, refresh_days);
    let permissions = profile.permissions();
    Ok((
        LoginResponse {
            access_token: token_pair.access_token,
            expires_in: config.jwt.access_token_expiry * 60,
            profile,
            permissions,
            created_at: chrono::Utc::now(),
        },
        cookie,
    ))
}

/// 规范化邮箱：去空白、转小写
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
