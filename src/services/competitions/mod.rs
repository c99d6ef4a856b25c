pub mod list;
pub mod save;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::competitions::requests::{CompetitionListQuery, CompetitionRequest};
use crate::storage::Storage;

pub struct CompetitionService {
    storage: Option<Arc<dyn Storage>>,
}

impl CompetitionService {
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

    /// 公开列表，只含已发布的比赛
    pub async fn list_competitions(
        &self,
        request: &HttpRequest,
        query: CompetitionListQuery,
    ) -> ActixResult<HttpResponse> {
        list::handle_list_competitions(self, request, query, false).await
    }

    /// 管理列表，包含草稿
    pub async fn manage_competitions(
        &self,
        request: &HttpRequest,
        query: CompetitionListQuery,
    ) -> ActixResult<HttpResponse> {
        list::handle_list_competitions(self, request, query, true).await
    }

    pub async fn get_competition(
        &self,
        request: &HttpRequest,
        competition_id: i64,
    ) -> ActixResult<HttpResponse> {
        list::handle_get_competition(self, request, competition_id).await
    }

    pub async fn create_competition(
        &self,
        request: &HttpRequest,
        body: CompetitionRequest,
    ) -> ActixResult<HttpResponse> {
        save::handle_create_competition(self, request, body).await
    }

    pub async fn update_competition(
        &self,
        request: &HttpRequest,
        competition_id: i64,
        body: CompetitionRequest,
    ) -> ActixResult<HttpResponse> {
        save::handle_update_competition(self, request, competition_id, body).await
    }
}
