use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AdminService;
use crate::middlewares::require_jwt::invalidate_profile;
use crate::models::profiles::entities::UserRole;
use crate::models::profiles::requests::AssignTeacherRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::auth::normalize_email;
use crate::services::realtime::sync_subscriber_role;
use crate::services::{get_cache, internal_error};

/// 按邮箱把用户设为老师
pub async fn handle_assign_teacher(
    service: &AdminService,
    request: &HttpRequest,
    assign: AssignTeacherRequest,
) -> ActixResult<HttpResponse> {
    let Some(email) = assign
        .email
        .as_deref()
        .map(normalize_email)
        .filter(|e| !e.is_empty())
    else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Email is required",
        )));
    };

    let storage = service.get_storage(request);
    let profile = match storage.get_profile_by_email(&email).await {
        Ok(Some(profile)) => profile,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                "User not found",
            )));
        }
        Err(e) => return Ok(internal_error("查询用户失败", e)),
    };

    match storage.update_role(profile.id, UserRole::Staff).await {
        Ok(Some(updated)) => {
            invalidate_profile(get_cache(request).as_ref(), updated.id).await;
            sync_subscriber_role(updated.id, updated.role);
            Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(format!(
                "{} is now a teacher!",
                updated.email
            ))))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(e) => Ok(internal_error("设置老师失败", e)),
    }
}
