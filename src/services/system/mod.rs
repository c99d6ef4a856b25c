pub mod health;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

pub struct SystemService;

impl SystemService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub async fn health(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        health::handle_health(request).await
    }
}
