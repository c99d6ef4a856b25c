/*!
 * JWT 认证中间件
 *
 * 校验 `Authorization: Bearer <access token>`，按 token 中的用户 ID 读取资料
 * （优先走缓存 `profile:{id}`），并写入请求扩展。
 *
 * ```rust,ignore
 * web::scope("/api/submissions")
 *     .wrap(RequireJWT)
 *     .route("/my", web::get().to(list_my_submissions))
 * ```
 *
 * 处理函数中使用 `RequireJWT::extract_profile(&req)` 取当前用户。
 * 角色变更后需调用 `invalidate_profile` 清掉缓存，否则旧角色会保留到 TTL 结束。
 */

use crate::cache::{ObjectCache, get_json, insert_json};
use crate::config::AppConfig;
use crate::models::ErrorCode;
use crate::models::profiles::entities::{Profile, UserRole};
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, info};

use super::create_error_response;

const BEARER_PREFIX: &str = "Bearer ";
const AUTHORIZATION_HEADER: &str = "Authorization";

#[derive(Clone)]
pub struct RequireJWT;

pub fn profile_cache_key(profile_id: i64) -> String {
    format!("profile:{profile_id}")
}

/// 清除用户资料缓存
pub async fn invalidate_profile(cache: &dyn ObjectCache, profile_id: i64) {
    cache.remove(&profile_cache_key(profile_id)).await;
}

/// 从 Authorization 头中取出 Bearer token
pub fn bearer_token(headers: &actix_web::http::header::HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// 校验 access token 并加载用户
///
/// WebSocket 握手用 query 传 token，也走这里。
pub async fn authenticate_token(
    token: &str,
    storage: &Arc<dyn Storage>,
    cache: &Arc<dyn ObjectCache>,
) -> Result<Profile, String> {
    let claims = JwtUtils::verify_access_token(token).map_err(|err| {
        info!("JWT token validation failed: {}", err);
        "Invalid JWT token".to_string()
    })?;

    let profile_id = claims
        .sub
        .parse::<i64>()
        .map_err(|_| "Invalid user ID in JWT".to_string())?;

    let key = profile_cache_key(profile_id);
    if let Some(profile) = get_json::<Profile>(cache.as_ref(), &key).await {
        return Ok(profile);
    }
    debug!("Profile {} not cached, loading from storage", profile_id);

    let profile = storage
        .get_profile_by_id(profile_id)
        .await
        .map_err(|_| "Failed to retrieve user from storage".to_string())?
        .ok_or_else(|| "User not found".to_string())?;

    insert_json(
        cache.as_ref(),
        &key,
        &profile,
        AppConfig::get().cache.default_ttl,
    )
    .await;

    Ok(profile)
}

async fn extract_and_validate_jwt(req: &ServiceRequest) -> Result<Profile, String> {
    let token = bearer_token(req.headers())
        .ok_or_else(|| "Missing or invalid Authorization header".to_string())?;

    let storage = req
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .ok_or_else(|| "Storage not configured".to_string())?
        .get_ref()
        .clone();
    let cache = req
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .ok_or_else(|| "Cache not configured".to_string())?
        .get_ref()
        .clone();

    authenticate_token(token, &storage, &cache).await
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 预检请求直接放行
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match extract_and_validate_jwt(&req).await {
                Ok(profile) => {
                    debug!("JWT authentication successful for ID: {}", profile.id);
                    req.extensions_mut().insert(profile);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(err) => {
                    info!(
                        "JWT authentication failed for request to {}: {}",
                        req.path(),
                        err
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            &format!("Unauthorized: {err}"),
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

impl RequireJWT {
    /// 当前登录用户，须在 RequireJWT 之后调用
    pub fn extract_profile(req: &actix_web::HttpRequest) -> Option<Profile> {
        req.extensions().get::<Profile>().cloned()
    }

    pub fn extract_user_id(req: &actix_web::HttpRequest) -> Option<i64> {
        req.extensions().get::<Profile>().map(|profile| profile.id)
    }

    pub fn extract_user_role(req: &actix_web::HttpRequest) -> Option<UserRole> {
        req.extensions().get::<Profile>().map(|profile| profile.role)
    }

    /// 公开路由上的可选登录：带了有效 token 就返回用户，否则 None
    pub async fn optional_profile(req: &actix_web::HttpRequest) -> Option<Profile> {
        if let Some(profile) = Self::extract_profile(req) {
            return Some(profile);
        }
        let token = bearer_token(req.headers())?;
        let storage = req.app_data::<web::Data<Arc<dyn Storage>>>()?;
        let cache = req.app_data::<web::Data<Arc<dyn ObjectCache>>>()?;
        authenticate_token(token, storage.get_ref(), cache.get_ref())
            .await
            .ok()
    }
}
