pub mod avatar;
pub mod profile;
pub mod stats;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::profiles::requests::UpdateProfileRequest;
use crate::storage::Storage;

pub struct ProfileService {
    storage: Option<Arc<dyn Storage>>,
}

impl ProfileService {
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

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    pub async fn get_profile(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        profile::handle_get_profile(self, request).await
    }

    pub async fn update_profile(
        &self,
        request: &HttpRequest,
        update: UpdateProfileRequest,
    ) -> ActixResult<HttpResponse> {
        profile::handle_update_profile(self, request, update).await
    }

    pub async fn upload_avatar(
        &self,
        request: &HttpRequest,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        avatar::handle_upload_avatar(self, request, payload).await
    }

    pub async fn delete_avatar(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        avatar::handle_delete_avatar(self, request).await
    }

    pub async fn student_stats(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        stats::handle_student_stats(self, request).await
    }
}
