//! 对象读取接口
//!
//! `/storage/v1/object/public/{bucket}/{path}` 只对公开 bucket 生效；
//! `/storage/v1/object/sign/{bucket}/{path}?token=` 需要签名 token 与 bucket、路径完全一致。

pub mod serve;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SignedObjectQuery {
    pub token: Option<String>,
}

pub struct ObjectService;

impl ObjectService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub async fn serve_public(
        &self,
        request: &HttpRequest,
        bucket: &str,
        path: &str,
    ) -> ActixResult<HttpResponse> {
        serve::handle_serve_public(request, bucket, path).await
    }

    pub async fn serve_signed(
        &self,
        request: &HttpRequest,
        bucket: &str,
        path: &str,
        query: SignedObjectQuery,
    ) -> ActixResult<HttpResponse> {
        serve::handle_serve_signed(request, bucket, path, query).await
    }
}
