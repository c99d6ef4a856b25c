use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use crate::models::realtime::RealtimeQuery;
use crate::services::RealtimeService;

pub async fn connect(
    req: HttpRequest,
    body: web::Payload,
    query: web::Query<RealtimeQuery>,
) -> ActixResult<HttpResponse> {
    RealtimeService::connect(req, body, query.into_inner()).await
}

// 配置路由（认证在握手时通过 query token 完成）
pub fn configure_realtime_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/v1/realtime", web::get().to(connect));
}
