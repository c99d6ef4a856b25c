use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::PosterService;
use crate::models::ApiResponse;
use crate::models::posters::responses::PosterListResponse;
use crate::services::internal_error;

pub async fn handle_list_posters(
    service: &PosterService,
    request: &HttpRequest,
    active_only: bool,
) -> ActixResult<HttpResponse> {
    match service.get_storage(request).list_posters(active_only).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            PosterListResponse { items },
            "获取成功",
        ))),
        Err(e) => Ok(internal_error("获取海报列表失败", e)),
    }
}
