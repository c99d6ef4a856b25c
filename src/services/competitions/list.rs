use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{DateTime, Utc};

use super::CompetitionService;
use crate::middlewares::RequireJWT;
use crate::models::competitions::requests::CompetitionListQuery;
use crate::models::competitions::responses::CompetitionListResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::internal_error;
use crate::storage::CompetitionFilter;
use crate::utils::dates::parse_flexible_date;

fn parse_bound(value: Option<&str>) -> Result<Option<DateTime<Utc>>, String> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => parse_flexible_date(raw)
            .map(Some)
            .ok_or_else(|| format!("Invalid date: {raw}")),
    }
}

fn build_filter(
    query: &CompetitionListQuery,
    include_unpublished: bool,
    now: DateTime<Utc>,
) -> Result<CompetitionFilter, String> {
    Ok(CompetitionFilter {
        include_unpublished,
        status: query.status,
        from: parse_bound(query.from.as_deref())?,
        to: parse_bound(query.to.as_deref())?,
        now,
    })
}

pub async fn handle_list_competitions(
    service: &CompetitionService,
    request: &HttpRequest,
    query: CompetitionListQuery,
    include_unpublished: bool,
) -> ActixResult<HttpResponse> {
    let filter = match build_filter(&query, include_unpublished, Utc::now()) {
        Ok(filter) => filter,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::CompetitionDateInvalid,
                msg,
            )));
        }
    };

    match service.get_storage(request).list_competitions(filter).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            CompetitionListResponse { items },
            "获取成功",
        ))),
        Err(e) => Ok(internal_error("获取比赛列表失败", e)),
    }
}

/// 未发布的比赛只对管理员/老师可见，其余人看到 404
pub async fn handle_get_competition(
    service: &CompetitionService,
    request: &HttpRequest,
    competition_id: i64,
) -> ActixResult<HttpResponse> {
    let can_see_drafts = RequireJWT::optional_profile(request)
        .await
        .is_some_and(|profile| profile.role.is_staff_or_admin());

    match service
        .get_storage(request)
        .get_competition_by_id(competition_id)
        .await
    {
        Ok(Some(competition)) if competition.published || can_see_drafts => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(competition, "获取成功")))
        }
        Ok(_) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::CompetitionNotFound,
            "Competition not found",
        ))),
        Err(e) => Ok(internal_error("获取比赛失败", e)),
    }
}
