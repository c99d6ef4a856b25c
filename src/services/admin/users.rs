use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AdminService;
use crate::middlewares::RequireJWT;
use crate::middlewares::require_jwt::invalidate_profile;
use crate::models::profiles::requests::{ProfileListParams, ProfileListQuery, UpdateRoleRequest};
use crate::models::profiles::responses::ProfileResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::realtime::sync_subscriber_role;
use crate::services::{get_cache, internal_error, unauthorized};

/// 用户列表，按注册时间倒序
pub async fn handle_list_users(
    service: &AdminService,
    request: &HttpRequest,
    query: ProfileListQuery,
) -> ActixResult<HttpResponse> {
    let params = ProfileListParams::from(query);
    match service
        .get_storage(request)
        .list_profiles_with_pagination(params)
        .await
    {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(list, "获取成功"))),
        Err(e) => Ok(internal_error("获取用户列表失败", e)),
    }
}

pub async fn handle_update_role(
    service: &AdminService,
    request: &HttpRequest,
    user_id: i64,
    update: UpdateRoleRequest,
) -> ActixResult<HttpResponse> {
    let Some(current_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    // 管理员不能修改自己的角色，避免系统里没有管理员
    if current_id == user_id {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::UserRoleInvalid,
            "You cannot change your own role",
        )));
    }

    match service
        .get_storage(request)
        .update_role(user_id, update.role)
        .await
    {
        Ok(Some(profile)) => {
            invalidate_profile(get_cache(request).as_ref(), user_id).await;
            sync_subscriber_role(user_id, profile.role);
            tracing::info!(
                "Admin {} changed role of {} to {}",
                current_id,
                profile.email,
                profile.role
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                ProfileResponse::from(profile),
                "Role updated",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(e) => Ok(internal_error("修改角色失败", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::common::PaginationQuery;
    use crate::models::profiles::entities::UserRole;
    use crate::services::test_support::{TestContext, body_json};
    use crate::storage::sea_orm_storage::test_support::seed_profile;
    use actix_web::http::StatusCode;

    #[actix_web::test]
    async fn test_list_filters_by_role() {
        let ctx = TestContext::new().await;
        let admin = seed_profile(&ctx.db, "admin@artclub.org", UserRole::Admin).await;
        seed_profile(&ctx.db, "a@artclub.org", UserRole::Student).await;
        seed_profile(&ctx.db, "b@artclub.org", UserRole::Student).await;
        seed_profile(&ctx.db, "t@artclub.org", UserRole::Staff).await;

        let resp = handle_list_users(
            &AdminService::new_lazy(),
            &ctx.request_as(&admin),
            ProfileListQuery {
                pagination: PaginationQuery::default(),
                role: Some(UserRole::Student),
                search: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);
        assert_eq!(body["data"]["pagination"]["total"], 2);
    }

    #[actix_web::test]
    async fn test_update_role() {
        let ctx = TestContext::new().await;
        let admin = seed_profile(&ctx.db, "admin@artclub.org", UserRole::Admin).await;
        let kid = seed_profile(&ctx.db, "kid@artclub.org", UserRole::Student).await;
        let service = AdminService::new_lazy();

        let resp = handle_update_role(
            &service,
            &ctx.request_as(&admin),
            kid.id,
            UpdateRoleRequest {
                role: UserRole::Staff,
            },
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["data"]["profile"]["role"], "staff");
        assert_eq!(body["data"]["permissions"]["can_grade"], true);

        let own = handle_update_role(
            &service,
            &ctx.request_as(&admin),
            admin.id,
            UpdateRoleRequest {
                role: UserRole::Student,
            },
        )
        .await
        .unwrap();
        assert_eq!(own.status(), StatusCode::BAD_REQUEST);

        let missing = handle_update_role(
            &service,
            &ctx.request_as(&admin),
            9999,
            UpdateRoleRequest {
                role: UserRole::Staff,
            },
        )
        .await
        .unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_demoted_teacher_leaves_staff_feed() {
        use crate::models::realtime::{ChangeEvent, ChangeTable, RealtimeMessage};
        use crate::services::realtime::{ConnectionManager, publish_owned_change};

        let ctx = TestContext::new().await;
        let admin = seed_profile(&ctx.db, "admin@artclub.org", UserRole::Admin).await;
        // 连接表是全局的，多插几行让老师的 ID 不与其他测试重复
        for i in 0..4 {
            seed_profile(&ctx.db, &format!("filler{i}@artclub.org"), UserRole::Student).await;
        }
        let teacher = seed_profile(&ctx.db, "ex-teacher@artclub.org", UserRole::Staff).await;
        let mut rx = ConnectionManager::get().register(teacher.id, UserRole::Staff);

        let resp = handle_update_role(
            &AdminService::new_lazy(),
            &ctx.request_as(&admin),
            teacher.id,
            UpdateRoleRequest {
                role: UserRole::Student,
            },
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        publish_owned_change(ChangeTable::Submissions, ChangeEvent::Insert, 880_001, 880_002);
        let sent = RealtimeMessage::change(ChangeTable::Submissions, ChangeEvent::Insert, 880_001);
        while let Ok(msg) = rx.try_recv() {
            assert_ne!(msg, sent);
        }
    }
}
