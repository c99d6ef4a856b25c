use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TutorialService;
use crate::models::tutorials::requests::TutorialListQuery;
use crate::models::tutorials::responses::TutorialListResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::internal_error;

pub async fn handle_list_tutorials(
    service: &TutorialService,
    request: &HttpRequest,
    query: TutorialListQuery,
) -> ActixResult<HttpResponse> {
    match service
        .get_storage(request)
        .list_tutorials(query.category)
        .await
    {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            TutorialListResponse { items },
            "获取成功",
        ))),
        Err(e) => Ok(internal_error("获取教程列表失败", e)),
    }
}

pub async fn handle_get_tutorial(
    service: &TutorialService,
    request: &HttpRequest,
    tutorial_id: i64,
) -> ActixResult<HttpResponse> {
    match service
        .get_storage(request)
        .get_tutorial_by_id(tutorial_id)
        .await
    {
        Ok(Some(tutorial)) => Ok(HttpResponse::Ok().json(ApiResponse::success(tutorial, "获取成功"))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::TutorialNotFound,
            "Tutorial not found",
        ))),
        Err(e) => Ok(internal_error("获取教程失败", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tutorials::entities::TutorialCategory;
    use crate::services::test_support::{TestContext, body_json};
    use crate::storage::sea_orm_storage::test_support::seed_tutorial;
    use actix_web::http::StatusCode;

    #[actix_web::test]
    async fn test_list_by_category() {
        let ctx = TestContext::new().await;
        seed_tutorial(&ctx.db, "Layers", TutorialCategory::DigitalArt).await;
        seed_tutorial(&ctx.db, "Gesture", TutorialCategory::QuickSketch).await;
        seed_tutorial(&ctx.db, "Brushes", TutorialCategory::DigitalArt).await;
        let service = TutorialService::new_lazy();

        let resp = handle_list_tutorials(&service, &ctx.request(), TutorialListQuery::default())
            .await
            .unwrap();
        let body = body_json(resp).await;
        assert_eq!(body["data"]["items"].as_array().unwrap().len(), 3);

        let resp = handle_list_tutorials(
            &service,
            &ctx.request(),
            TutorialListQuery {
                category: Some(TutorialCategory::DigitalArt),
            },
        )
        .await
        .unwrap();
        let body = body_json(resp).await;
        let items = body["data"]["items"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["title"], "Layers");
        assert_eq!(items[1]["order_index"], 1);
    }

    #[actix_web::test]
    async fn test_get_missing_tutorial() {
        let ctx = TestContext::new().await;
        let resp = handle_get_tutorial(&TutorialService::new_lazy(), &ctx.request(), 42)
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
