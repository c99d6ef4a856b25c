use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::posters::requests::UpdatePosterRequest;
use crate::models::profiles::entities::UserRole;
use crate::services::PosterService;
use crate::utils::SafeIDI64;

// 懒加载的全局 PosterService 实例
static POSTER_SERVICE: Lazy<PosterService> = Lazy::new(PosterService::new_lazy);

pub async fn list_active_posters(req: HttpRequest) -> ActixResult<HttpResponse> {
    POSTER_SERVICE.list_active_posters(&req).await
}

pub async fn list_all_posters(req: HttpRequest) -> ActixResult<HttpResponse> {
    POSTER_SERVICE.list_all_posters(&req).await
}

pub async fn create_poster(req: HttpRequest, payload: Multipart) -> ActixResult<HttpResponse> {
    POSTER_SERVICE.create_poster(&req, payload).await
}

pub async fn update_poster(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<UpdatePosterRequest>,
) -> ActixResult<HttpResponse> {
    POSTER_SERVICE
        .update_poster(&req, path.0, body.into_inner())
        .await
}

pub async fn replace_poster_image(
    req: HttpRequest,
    path: SafeIDI64,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    POSTER_SERVICE
        .replace_poster_image(&req, path.0, payload)
        .await
}

// 配置路由
pub fn configure_poster_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/posters")
            .service(
                web::resource("")
                    .route(web::get().to(list_active_posters))
                    .route(
                        web::post()
                            .to(create_poster)
                            .wrap(RateLimit::file_upload())
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                            .wrap(middlewares::RequireJWT),
                    ),
            )
            // 管理端接口 - 仅管理员
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
                    .wrap(middlewares::RequireJWT)
                    .route("/all", web::get().to(list_all_posters))
                    .route("/{id}", web::put().to(update_poster))
                    .service(
                        web::resource("/{id}/image")
                            .wrap(RateLimit::file_upload())
                            .route(web::post().to(replace_poster_image)),
                    ),
            ),
    );
}
