pub mod assign_teacher;
pub mod users;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::profiles::requests::{
    AssignTeacherRequest, ProfileListQuery, UpdateRoleRequest,
};
use crate::storage::Storage;

pub struct AdminService {
    storage: Option<Arc<dyn Storage>>,
}

impl AdminService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub async fn list_users(
        &self,
        request: &HttpRequest,
        query: ProfileListQuery,
    ) -> ActixResult<HttpResponse> {
        users::handle_list_users(self, request, query).await
    }

    pub async fn update_role(
        &self,
        request: &HttpRequest,
        user_id: i64,
        update: UpdateRoleRequest,
    ) -> ActixResult<HttpResponse> {
        users::handle_update_role(self, request, user_id, update).await
    }

    pub async fn assign_teacher(
        &self,
        request: &HttpRequest,
        assign: AssignTeacherRequest,
    ) -> ActixResult<HttpResponse> {
        assign_teacher::handle_assign_teacher(self, request, assign).await
    }
}
