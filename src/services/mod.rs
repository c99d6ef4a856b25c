pub mod admin;
pub mod auth;
pub mod competitions;
pub mod objects;
pub mod posters;
pub mod profiles;
pub mod realtime;
pub mod submissions;
pub mod system;
pub mod tutorials;

pub use admin::AdminService;
pub use auth::AuthService;
pub use competitions::CompetitionService;
pub use objects::ObjectService;
pub use posters::PosterService;
pub use profiles::ProfileService;
pub use realtime::RealtimeService;
pub use submissions::SubmissionService;
pub use system::SystemService;
pub use tutorials::TutorialService;

use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::errors::ArtClubError;
use crate::models::{ApiResponse, ErrorCode};
use crate::object_store::ObjectStore;

pub(crate) fn get_object_store(request: &HttpRequest) -> Arc<dyn ObjectStore> {
    request
        .app_data::<web::Data<Arc<dyn ObjectStore>>>()
        .expect("Object store not found in app data")
        .get_ref()
        .clone()
}

pub(crate) fn get_cache(request: &HttpRequest) -> Arc<dyn ObjectCache> {
    request
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .expect("Cache not found in app data")
        .get_ref()
        .clone()
}

/// 存储层错误统一转为 500
pub(crate) fn internal_error(context: &str, e: ArtClubError) -> HttpResponse {
    tracing::error!("{}: {}", context, e);
    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
        ErrorCode::InternalServerError,
        format!("{context}: {}", e.message()),
    ))
}

pub(crate) fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::Unauthorized,
        "无法获取用户信息",
    ))
}

pub(crate) fn forbidden(message: &str) -> HttpResponse {
    HttpResponse::Forbidden().json(ApiResponse::error_empty(ErrorCode::Forbidden, message))
}
