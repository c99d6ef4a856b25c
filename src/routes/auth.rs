use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::auth::requests::{
    CallbackQuery, CodeExchangeRequest, LoginRequest, MagicLinkRequest, RegisterRequest,
};
use crate::services::AuthService;

// 懒加载的全局 AuthService 实例
static AUTH_SERVICE: Lazy<AuthService> = Lazy::new(AuthService::new_lazy);

pub async fn login(
    req: HttpRequest,
    body: web::Json<LoginRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.login(body.into_inner(), &req).await
}

pub async fn register(
    req: HttpRequest,
    body: web::Json<RegisterRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.register(body.into_inner(), &req).await
}

pub async fn magic_link(
    req: HttpRequest,
    body: web::Json<MagicLinkRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.magic_link(body.into_inner(), &req).await
}

pub async fn exchange_code(
    req: HttpRequest,
    body: web::Json<CodeExchangeRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.exchange_code(body.into_inner(), &req).await
}

// 邮件里的链接直接打开这里
pub async fn browser_callback(
    req: HttpRequest,
    query: web::Query<CallbackQuery>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.browser_callback(query.into_inner(), &req).await
}

pub async fn refresh_token(request: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.refresh_token(&request).await
}

pub async fn logout() -> ActixResult<HttpResponse> {
    AUTH_SERVICE.logout().await
}

pub async fn verify_token(request: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.verify_token(&request).await
}

pub async fn get_me(request: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.get_me(&request).await
}

// 配置路由
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/auth/callback", web::get().to(browser_callback))
        .service(
            web::scope("/api/v1/auth")
                .service(
                    web::resource("/login")
                        .wrap(RateLimit::login())
                        .route(web::post().to(login)),
                )
                .service(
                    web::resource("/register")
                        .wrap(RateLimit::register())
                        .route(web::post().to(register)),
                )
                .service(
                    web::resource("/magic-link")
                        .wrap(RateLimit::magic_link())
                        .route(web::post().to(magic_link)),
                )
                .service(
                    web::resource("/callback")
                        .wrap(RateLimit::code_exchange())
                        .route(web::post().to(exchange_code)),
                )
                .service(
                    web::resource("/refresh")
                        .wrap(RateLimit::refresh_token())
                        .route(web::post().to(refresh_token)),
                )
                .route("/logout", web::post().to(logout))
                .service(
                    web::scope("")
                        .wrap(middlewares::RequireJWT)
                        .route("/verify-token", web::get().to(verify_token))
                        .route("/me", web::get().to(get_me)),
                ),
        );
}
