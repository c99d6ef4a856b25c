use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ProfileService;
use crate::middlewares::RequireJWT;
use crate::middlewares::require_jwt::invalidate_profile;
use crate::models::profiles::entities::Profile;
use crate::models::profiles::responses::AvatarResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::object_store::{Bucket, ObjectStore};
use crate::services::{get_cache, get_object_store, internal_error, unauthorized};
use crate::utils::multipart::{UploadRules, read_upload_form};

/// 头像对象路径：每个用户一个目录
fn avatar_path(user_id: i64, bare_extension: &str) -> String {
    format!("{user_id}/avatar.{bare_extension}")
}

/// 当前头像在 avatars bucket 中的路径，链接不是本存储生成的则为 None
fn current_avatar_path(objects: &dyn ObjectStore, profile: &Profile) -> Option<String> {
    profile
        .avatar_url
        .as_deref()
        .and_then(|url| objects.path_from_public_url(Bucket::Avatars, url))
}

async fn remove_avatar_object(objects: &dyn ObjectStore, user_id: i64, path: String) {
    if let Err(e) = objects.remove(Bucket::Avatars, &[path]).await {
        tracing::warn!("Failed to remove old avatar of {}: {}", user_id, e);
    }
}

pub async fn handle_upload_avatar(
    service: &ProfileService,
    request: &HttpRequest,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    let Some(profile) = RequireJWT::extract_profile(request) else {
        return Ok(unauthorized());
    };
    let config = service.get_config();
    let storage = service.get_storage(request);
    let objects = get_object_store(request);

    let rules = UploadRules {
        file_field: "file",
        allowed_extensions: &config.upload.image_types,
        max_size: config.upload.max_size,
    };
    let form = match read_upload_form(payload, &rules).await {
        Ok(form) => form,
        Err(rejection) => return Ok(rejection.into_response()),
    };
    let Some(file) = form.file else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::FileUploadFailed,
            "No file uploaded",
        )));
    };

    // 以数据库为准，缓存里的 avatar_url 可能已过期
    let current = match storage.get_profile_by_id(profile.id).await {
        Ok(Some(current)) => current,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                "User not found",
            )));
        }
        Err(e) => return Ok(internal_error("获取用户资料失败", e)),
    };
    let old_path = current_avatar_path(objects.as_ref(), &current);

    // 新对象写入且资料更新成功后才删除旧对象，扩展名相同时直接覆盖
    let path = avatar_path(profile.id, file.bare_extension());
    if let Err(e) = objects.put(Bucket::Avatars, &path, &file.data, true).await {
        tracing::error!("Failed to store avatar for {}: {}", profile.id, e);
        return Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
            ErrorCode::FileUploadFailed,
            "Failed to store avatar",
        )));
    }

    let avatar_url = objects.public_url(Bucket::Avatars, &path);
    match storage
        .update_avatar_url(profile.id, Some(avatar_url.clone()))
        .await
    {
        Ok(_) => {
            invalidate_profile(get_cache(request).as_ref(), profile.id).await;
            if let Some(old_path) = old_path.filter(|old| *old != path) {
                remove_avatar_object(objects.as_ref(), profile.id, old_path).await;
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                AvatarResponse {
                    avatar_url: Some(avatar_url),
                },
                "Avatar updated",
            )))
        }
        Err(e) => {
            // 同路径时新文件已覆盖旧文件，保留它让链接仍然可用
            if old_path.as_deref() != Some(path.as_str()) {
                let _ = objects.remove(Bucket::Avatars, &[path]).await;
            }
            Ok(internal_error("更新头像失败", e))
        }
    }
}

pub async fn handle_delete_avatar(
    service: &ProfileService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(user_id) = RequireJWT::extract_user_id(request) else {
        return Ok(unauthorized());
    };
    let storage = service.get_storage(request);
    let objects = get_object_store(request);

    let current = match storage.get_profile_by_id(user_id).await {
        Ok(Some(current)) => current,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::UserNotFound,
                "User not found",
            )));
        }
        Err(e) => return Ok(internal_error("获取用户资料失败", e)),
    };
    let old_path = current_avatar_path(objects.as_ref(), &current);

    match storage.update_avatar_url(user_id, None).await {
        Ok(_) => {
            invalidate_profile(get_cache(request).as_ref(), user_id).await;
            if let Some(old_path) = old_path {
                remove_avatar_object(objects.as_ref(), user_id, old_path).await;
            }
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                AvatarResponse { avatar_url: None },
                "Avatar removed",
            )))
        }
        Err(e) => Ok(internal_error("删除头像失败", e)),
    }
}
