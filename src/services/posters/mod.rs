pub mod create;
pub mod list;
pub mod update;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::posters::requests::UpdatePosterRequest;
use crate::storage::Storage;

pub struct PosterService {
    storage: Option<Arc<dyn Storage>>,
}

impl PosterService {
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

    /// 首页展示的海报
    pub async fn list_active_posters(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::handle_list_posters(self, request, true).await
    }

    pub async fn list_all_posters(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::handle_list_posters(self, request, false).await
    }

    pub async fn create_poster(
        &self,
        request: &HttpRequest,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        create::handle_create_poster(self, request, payload).await
    }

    pub async fn update_poster(
        &self,
        request: &HttpRequest,
        poster_id: i64,
        update: UpdatePosterRequest,
    ) -> ActixResult<HttpResponse> {
        update::handle_update_poster(self, request, poster_id, update).await
    }

    pub async fn replace_poster_image(
        &self,
        request: &HttpRequest,
        poster_id: i64,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        update::handle_replace_image(self, request, poster_id, payload).await
    }
}
