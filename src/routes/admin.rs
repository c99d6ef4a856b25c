use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::profiles::entities::UserRole;
use crate::models::profiles::requests::{AssignTeacherRequest, ProfileListQuery, UpdateRoleRequest};
use crate::services::AdminService;
use crate::utils::SafeIDI64;

// 懒加载的全局 AdminService 实例
static ADMIN_SERVICE: Lazy<AdminService> = Lazy::new(AdminService::new_lazy);

pub async fn list_users(
    req: HttpRequest,
    query: web::Query<ProfileListQuery>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.list_users(&req, query.into_inner()).await
}

pub async fn update_role(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<UpdateRoleRequest>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE
        .update_role(&req, path.0, body.into_inner())
        .await
}

pub async fn assign_teacher(
    req: HttpRequest,
    body: web::Json<AssignTeacherRequest>,
) -> ActixResult<HttpResponse> {
    ADMIN_SERVICE.assign_teacher(&req, body.into_inner()).await
}

// 配置路由
pub fn configure_admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/admin")
            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
            .wrap(middlewares::RequireJWT)
            .route("/users", web::get().to(list_users))
            .route("/users/{id}/role", web::put().to(update_role))
            .route("/assign-teacher", web::post().to(assign_teacher)),
    )
    .service(
        web::scope("/api/assign-teacher")
            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles()))
            .wrap(middlewares::RequireJWT)
            .route("", web::post().to(assign_teacher)),
    );
}
