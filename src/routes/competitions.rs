use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::competitions::requests::{CompetitionListQuery, CompetitionRequest};
use crate::models::profiles::entities::UserRole;
use crate::services::CompetitionService;
use crate::utils::SafeIDI64;

// 懒加载的全局 CompetitionService 实例
static COMPETITION_SERVICE: Lazy<CompetitionService> = Lazy::new(CompetitionService::new_lazy);

pub async fn list_competitions(
    req: HttpRequest,
    query: web::Query<CompetitionListQuery>,
) -> ActixResult<HttpResponse> {
    COMPETITION_SERVICE
        .list_competitions(&req, query.into_inner())
        .await
}

pub async fn manage_competitions(
    req: HttpRequest,
    query: web::Query<CompetitionListQuery>,
) -> ActixResult<HttpResponse> {
    COMPETITION_SERVICE
        .manage_competitions(&req, query.into_inner())
        .await
}

pub async fn get_competition(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    COMPETITION_SERVICE.get_competition(&req, path.0).await
}

pub async fn create_competition(
    req: HttpRequest,
    body: web::Json<CompetitionRequest>,
) -> ActixResult<HttpResponse> {
    COMPETITION_SERVICE
        .create_competition(&req, body.into_inner())
        .await
}

pub async fn update_competition(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<CompetitionRequest>,
) -> ActixResult<HttpResponse> {
    COMPETITION_SERVICE
        .update_competition(&req, path.0, body.into_inner())
        .await
}

// 配置路由
pub fn configure_competition_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/competitions")
            .service(
                web::resource("")
                    .route(web::get().to(list_competitions))
                    .route(
                        web::post()
                            .to(create_competition)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
                            .wrap(middlewares::RequireJWT),
                    ),
            )
            .service(
                web::resource("/manage")
                    .route(web::get().to(manage_competitions))
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
                    .wrap(middlewares::RequireJWT),
            )
            .service(
                web::resource("/{id}")
                    // 草稿是否可见在业务层判断
                    .route(web::get().to(get_competition))
                    .route(
                        web::put()
                            .to(update_competition)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
                            .wrap(middlewares::RequireJWT),
                    ),
            ),
    );
}
