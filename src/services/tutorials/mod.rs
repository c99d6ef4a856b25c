pub mod create;
pub mod list;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::tutorials::requests::TutorialListQuery;
use crate::storage::Storage;

pub struct TutorialService {
    storage: Option<Arc<dyn Storage>>,
}

impl TutorialService {
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

    pub async fn list_tutorials(
        &self,
        request: &HttpRequest,
        query: TutorialListQuery,
    ) -> ActixResult<HttpResponse> {
        list::handle_list_tutorials(self, request, query).await
    }

    pub async fn get_tutorial(
        &self,
        request: &HttpRequest,
        tutorial_id: i64,
    ) -> ActixResult<HttpResponse> {
        list::handle_get_tutorial(self, request, tutorial_id).await
    }

    pub async fn create_tutorial(
        &self,
        request: &HttpRequest,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        create::handle_create_tutorial(self, request, payload).await
    }
}
