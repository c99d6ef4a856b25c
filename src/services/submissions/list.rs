use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::middlewares::RequireJWT;
use crate::models::ApiResponse;
use crate::models::submissions::responses::{SubmissionItem, SubmissionListResponse};
use crate::services::{internal_error, unauthorized};

pub async fn handle_list_my_submissions(
    service: &SubmissionService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };

    match service
        .get_storage(request)
        .list_submission_details(Some(user_id))
        .await
    {
        Ok(details) => {
            let items = details
                .into_iter()
                .map(|detail| SubmissionItem::from_detail(detail, false))
                .collect();
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                SubmissionListResponse { items },
                "获取成功",
            )))
        }
        Err(e) => Ok(internal_error("获取提交列表失败", e)),
    }
}

pub async fn handle_list_all_submissions(
    service: &SubmissionService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(profile) = RequireJWT::extract_profile(request) else {
        return Ok(unauthorized());
    };
    let can_grade = profile.permissions().can_grade;

    match service.get_storage(request).list_submission_details(None).await {
        Ok(details) => {
            let items = details
                .into_iter()
                .map(|detail| SubmissionItem::from_detail(detail, can_grade))
                .collect();
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                SubmissionListResponse { items },
                "获取成功",
            )))
        }
        Err(e) => Ok(internal_error("获取提交列表失败", e)),
    }
}
