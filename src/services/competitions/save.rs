use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CompetitionService;
use crate::middlewares::RequireJWT;
use crate::models::competitions::requests::CompetitionRequest;
use crate::models::realtime::{ChangeEvent, ChangeTable};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::realtime::publish_public_change;
use crate::services::{internal_error, unauthorized};

pub async fn handle_create_competition(
    service: &CompetitionService,
    request: &HttpRequest,
    body: CompetitionRequest,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };
    let input = match body.validate() {
        Ok(input) => input,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::CompetitionDateInvalid,
                msg,
            )));
        }
    };

    match service
        .get_storage(request)
        .create_competition(input, user_id)
        .await
    {
        Ok(competition) => {
            publish_public_change(ChangeTable::Competitions, ChangeEvent::Insert, competition.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                competition,
                "Competition created",
            )))
        }
        Err(e) => Ok(internal_error("创建比赛失败", e)),
    }
}

pub async fn handle_update_competition(
    service: &CompetitionService,
    request: &HttpRequest,
    competition_id: i64,
    body: CompetitionRequest,
) -> ActixResult<HttpResponse> {
    let input = match body.validate() {
        Ok(input) => input,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::CompetitionDateInvalid,
                msg,
            )));
        }
    };

    match service
        .get_storage(request)
        .update_competition(competition_id, input)
        .await
    {
        Ok(Some(competition)) => {
            publish_public_change(ChangeTable::Competitions, ChangeEvent::Update, competition.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                competition,
                "Competition updated",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CompetitionNotFound,
            "Competition not found",
        ))),
        Err(e) => Ok(internal_error("更新比赛失败", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profiles::entities::UserRole;
    use crate::services::test_support::{TestContext, body_json};
    use crate::storage::sea_orm_storage::test_support::seed_profile;
    use actix_web::http::StatusCode;

    fn request(title: &str, start: &str, end: &str) -> CompetitionRequest {
        CompetitionRequest {
            title: title.to_string(),
            body: "Theme: reflections".to_string(),
            start_at: start.to_string(),
            end_at: end.to_string(),
            awards: vec!["First".into(), "".into()],
            published: true,
        }
    }

    #[actix_web::test]
    async fn test_create_and_update() {
        let ctx = TestContext::new().await;
        let teacher = seed_profile(&ctx.db, "t@artclub.org", UserRole::Staff).await;
        let service = CompetitionService::new_lazy();

        let resp = handle_create_competition(
            &service,
            &ctx.request_as(&teacher),
            request("Mirror Mirror", "2026-03-01", "2026-03-15"),
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = body_json(resp).await;
        assert_eq!(body["data"]["created_by"], teacher.id);
        assert_eq!(body["data"]["awards"], serde_json::json!(["First"]));
        let id = body["data"]["id"].as_i64().unwrap();

        let resp = handle_update_competition(
            &service,
            &ctx.request_as(&teacher),
            id,
            request("Mirror Mirror II", "2026-03-01", "2026-03-20T12:00:00Z"),
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["data"]["title"], "Mirror Mirror II");

        let resp = handle_update_competition(
            &service,
            &ctx.request_as(&teacher),
            id + 100,
            request("Ghost", "2026-03-01", "2026-03-02"),
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_end_before_start_rejected() {
        let ctx = TestContext::new().await;
        let teacher = seed_profile(&ctx.db, "t@artclub.org", UserRole::Staff).await;
        let resp = handle_create_competition(
            &CompetitionService::new_lazy(),
            &ctx.request_as(&teacher),
            request("Backwards", "2026-03-15", "2026-03-01"),
        )
        .await
        .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
