use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::profiles::entities::UserRole;
use crate::models::tutorials::requests::TutorialListQuery;
use crate::services::TutorialService;
use crate::utils::SafeIDI64;

// 懒加载的全局 TutorialService 实例
static TUTORIAL_SERVICE: Lazy<TutorialService> = Lazy::new(TutorialService::new_lazy);

pub async fn list_tutorials(
    req: HttpRequest,
    query: web::Query<TutorialListQuery>,
) -> ActixResult<HttpResponse> {
    TUTORIAL_SERVICE
        .list_tutorials(&req, query.into_inner())
        .await
}

pub async fn get_tutorial(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    TUTORIAL_SERVICE.get_tutorial(&req, path.0).await
}

pub async fn create_tutorial(req: HttpRequest, payload: Multipart) -> ActixResult<HttpResponse> {
    TUTORIAL_SERVICE.create_tutorial(&req, payload).await
}

// 配置路由
pub fn configure_tutorial_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/tutorials")
            .service(
                web::resource("")
                    .route(web::get().to(list_tutorials))
                    .route(
                        web::post()
                            .to(create_tutorial)
                            .wrap(RateLimit::file_upload())
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
                            .wrap(middlewares::RequireJWT),
                    ),
            )
            .route("/{id}", web::get().to(get_tutorial)),
    );
}
