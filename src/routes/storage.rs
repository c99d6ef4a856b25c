use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::services::ObjectService;
use crate::services::objects::SignedObjectQuery;

// 懒加载的全局 ObjectService 实例
static OBJECT_SERVICE: Lazy<ObjectService> = Lazy::new(ObjectService::new_lazy);

pub async fn serve_public(
    req: HttpRequest,
    path: web::Path<(String, String)>,
) -> ActixResult<HttpResponse> {
    let (bucket, object_path) = path.into_inner();
    OBJECT_SERVICE
        .serve_public(&req, &bucket, &object_path)
        .await
}

pub async fn serve_signed(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    query: web::Query<SignedObjectQuery>,
) -> ActixResult<HttpResponse> {
    let (bucket, object_path) = path.into_inner();
    OBJECT_SERVICE
        .serve_signed(&req, &bucket, &object_path, query.into_inner())
        .await
}

// 配置路由
pub fn configure_storage_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/storage/v1/object")
            .route("/public/{bucket}/{path:.*}", web::get().to(serve_public))
            .route("/sign/{bucket}/{path:.*}", web::get().to(serve_signed)),
    );
}
