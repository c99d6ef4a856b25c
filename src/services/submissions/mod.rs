pub mod create;
pub mod download;
pub mod list;
pub mod review;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::reviews::requests::ReviewRequest;
use crate::storage::Storage;

pub struct SubmissionService {
    storage: Option<Arc<dyn Storage>>,
}

impl SubmissionService {
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

    /// 学员提交作业
    pub async fn create_submission(
        &self,
        request: &HttpRequest,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        create::handle_create_submission(self, request, payload).await
    }

    /// 我的提交
    pub async fn list_my_submissions(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::handle_list_my_submissions(self, request).await
    }

    /// 全部提交（老师批改用）
    pub async fn list_all_submissions(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::handle_list_all_submissions(self, request).await
    }

    pub async fn download_submission(
        &self,
        request: &HttpRequest,
        submission_id: i64,
    ) -> ActixResult<HttpResponse> {
        download::handle_download_submission(self, request, submission_id).await
    }

    pub async fn review_submission(
        &self,
        request: &HttpRequest,
        submission_id: i64,
        review: ReviewRequest,
    ) -> ActixResult<HttpResponse> {
        review::handle_review_submission(self, request, submission_id, review).await
    }
}
