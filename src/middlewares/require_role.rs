/*!
 * 角色授权中间件
 *
 * 必须放在 `RequireJWT` 之后，从请求扩展中读取当前用户的角色。
 *
 * ```rust,ignore
 * web::scope("/api/admin")
 *     .wrap(RequireRole::new(&UserRole::Admin))
 *     .wrap(RequireJWT)
 * ```
 *
 * actix 中后注册的 wrap 先执行，所以 `RequireJWT` 写在后面。
 * 多个角色任一即可：
 *
 * ```rust,ignore
 * .wrap(RequireRole::new_any(UserRole::staff_roles()))
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use crate::models::{ErrorCode, profiles::entities::UserRole};

use super::{RequireJWT, create_error_response};

#[derive(Clone)]
pub struct RequireRole {
    required_roles: Vec<UserRole>,
    require_all: bool, // true表示需要所有角色，false表示任一角色即可
}

impl RequireRole {
    /// 创建需要特定角色的中间件
    pub fn new(role: &UserRole) -> Self {
        Self {
            required_roles: vec![*role],
            require_all: true,
        }
    }

    /// 创建需要任一角色的中间件
    pub fn new_any(roles: &[&UserRole]) -> Self {
        Self {
            required_roles: roles.iter().map(|r| **r).collect(),
            require_all: false,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            required_roles: self.required_roles.clone(),
            require_all: self.require_all,
        }))
    }
}

fn role_allowed(role: UserRole, required: &[UserRole], require_all: bool) -> bool {
    if require_all {
        required.iter().all(|r| *r == role)
    } else {
        required.contains(&role)
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    required_roles: Vec<UserRole>,
    require_all: bool,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
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
        let required_roles = self.required_roles.clone();
        let require_all = self.require_all;

        Box::pin(async move {
            let user_id = RequireJWT::extract_user_id(req.request());
            let user_role = RequireJWT::extract_user_role(req.request());

            match user_id.zip(user_role) {
                Some((user_id, user_role)) => {
                    let has_permission = role_allowed(user_role, &required_roles, require_all);

                    if has_permission {
                        let res = srv.call(req).await?.map_into_left_body();
                        Ok(res)
                    } else {
                        info!(
                            "Access denied for user {} (role: {:?}). Required roles: {:?}",
                            user_id, user_role, required_roles
                        );
                        Ok(req.into_response(
                            create_error_response(
                                StatusCode::FORBIDDEN,
                                ErrorCode::Forbidden,
                                "Access denied.",
                            )
                            .map_into_right_body(),
                        ))
                    }
                }
                None => {
                    info!(
                        "Role check failed: no profile in request, RequireJWT must run first"
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            "Authentication required",
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ObjectCache;
    use crate::cache::object_cache::moka::MokaCacheWrapper;
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::{SeaOrmStorage, test_support::seed_profile};
    use crate::utils::jwt::JwtUtils;
    use actix_web::http::header::AUTHORIZATION;
    use actix_web::{App, HttpResponse, web};
    use actix_web::test::{TestRequest, call_service, init_service};
    use std::sync::Arc;

    #[test]
    fn test_role_allowed() {
        assert!(role_allowed(UserRole::Admin, &[UserRole::Admin], true));
        assert!(!role_allowed(UserRole::Staff, &[UserRole::Admin], true));
        assert!(role_allowed(
            UserRole::Staff,
            &[UserRole::Staff, UserRole::Admin],
            false
        ));
        assert!(!role_allowed(
            UserRole::Student,
            &[UserRole::Staff, UserRole::Admin],
            false
        ));
    }

    #[actix_web::test]
    async fn test_student_forbidden_on_staff_scope() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let student = seed_profile(&storage, "kid@artclub.org", UserRole::Student).await;
        let teacher = seed_profile(&storage, "t@artclub.org", UserRole::Staff).await;
        let storage: Arc<dyn Storage> = Arc::new(storage);
        let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::with_limits(100, 60));

        let app = init_service(
            App::new()
                .app_data(web::Data::new(storage))
                .app_data(web::Data::new(cache))
                .service(
                    web::scope("/staff")
                        .wrap(RequireRole::new_any(UserRole::staff_roles()))
                        .wrap(RequireJWT)
                        .route("", web::get().to(HttpResponse::Ok)),
                ),
        )
        .await;

        let token = JwtUtils::generate_access_token(student.id, "student").unwrap();
        let req = TestRequest::get()
            .uri("/staff")
            .insert_header((AUTHORIZATION, format!("Bearer {token}")))
            .to_request();
        assert_eq!(
            call_service(&app, req).await.status(),
            StatusCode::FORBIDDEN
        );

        let token = JwtUtils::generate_access_token(teacher.id, "staff").unwrap();
        let req = TestRequest::get()
            .uri("/staff")
            .insert_header((AUTHORIZATION, format!("Bearer {token}")))
            .to_request();
        assert_eq!(call_service(&app, req).await.status(), StatusCode::OK);
    }
}
