use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::profiles::entities::UserRole;
use crate::models::reviews::requests::ReviewRequest;
use crate::services::SubmissionService;
use crate::utils::SafeIDI64;

// 懒加载的全局 SubmissionService 实例
static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);

pub async fn create_submission(
    req: HttpRequest,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE.create_submission(&req, payload).await
}

pub async fn list_my_submissions(req: HttpRequest) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE.list_my_submissions(&req).await
}

pub async fn list_all_submissions(req: HttpRequest) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE.list_all_submissions(&req).await
}

pub async fn download_submission(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE.download_submission(&req, path.0).await
}

pub async fn review_submission(
    req: HttpRequest,
    path: SafeIDI64,
    body: web::Json<ReviewRequest>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .review_submission(&req, path.0, body.into_inner())
        .await
}

// 配置路由
pub fn configure_homework_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/homework/submissions")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    // 全部提交 - 仅老师和管理员
                    .route(
                        web::get()
                            .to(list_all_submissions)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    )
                    // 提交作业 - 仅学员
                    .route(
                        web::post()
                            .to(create_submission)
                            .wrap(RateLimit::file_upload())
                            .wrap(middlewares::RequireRole::new_any(UserRole::student_roles())),
                    ),
            )
            .service(web::resource("/my").route(web::get().to(list_my_submissions)))
            // 权限在业务层检查（本人或老师）
            .service(web::resource("/{id}/download").route(web::get().to(download_submission)))
            .service(
                web::resource("/{id}/review")
                    .route(web::put().to(review_submission))
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
            ),
    );
}
