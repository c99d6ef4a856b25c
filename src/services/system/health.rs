use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use crate::models::system::responses::HealthResponse;
use crate::models::{ApiResponse, AppStartTime};
use crate::services::realtime;

pub async fn handle_health(request: &HttpRequest) -> ActixResult<HttpResponse> {
    let uptime_seconds = request
        .app_data::<web::Data<AppStartTime>>()
        .map(|start| {
            chrono::Utc::now()
                .signed_duration_since(start.start_datetime)
                .num_seconds()
        })
        .unwrap_or_default();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        HealthResponse {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds,
            realtime_connections: realtime::online_count(),
        },
        "服务运行正常",
    )))
}
