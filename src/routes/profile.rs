use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::profiles::entities::UserRole;
use crate::models::profiles::requests::UpdateProfileRequest;
use crate::services::ProfileService;

// 懒加载的全局 ProfileService 实例
static PROFILE_SERVICE: Lazy<ProfileService> = Lazy::new(ProfileService::new_lazy);

pub async fn get_profile(req: HttpRequest) -> ActixResult<HttpResponse> {
    PROFILE_SERVICE.get_profile(&req).await
}

pub async fn update_profile(
    req: HttpRequest,
    body: web::Json<UpdateProfileRequest>,
) -> ActixResult<HttpResponse> {
    PROFILE_SERVICE.update_profile(&req, body.into_inner()).await
}

pub async fn upload_avatar(req: HttpRequest, payload: Multipart) -> ActixResult<HttpResponse> {
    PROFILE_SERVICE.upload_avatar(&req, payload).await
}

pub async fn delete_avatar(req: HttpRequest) -> ActixResult<HttpResponse> {
    PROFILE_SERVICE.delete_avatar(&req).await
}

pub async fn student_stats(req: HttpRequest) -> ActixResult<HttpResponse> {
    PROFILE_SERVICE.student_stats(&req).await
}

// 配置路由
pub fn configure_profile_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/profile")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(get_profile))
            .route("", web::put().to(update_profile))
            .service(
                web::resource("/avatar")
                    .wrap(RateLimit::file_upload())
                    .route(web::post().to(upload_avatar))
                    .route(web::delete().to(delete_avatar)),
            )
            .route("/stats", web::get().to(student_stats)),
    )
    // 旧版前端使用的地址
    .service(
        web::scope("/api/student-stats")
            .wrap(middlewares::RequireRole::new_any(UserRole::student_roles()))
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(student_stats)),
    );
}
