use serde::Deserialize;
use ts_rs::TS;

use super::entities::UserRole;
use crate::models::common::PaginationQuery;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/profile.ts")]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
}

// 用户列表查询参数（HTTP 请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/profile.ts")]
pub struct ProfileListQuery {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    pub role: Option<UserRole>,
    pub search: Option<String>,
}

// 存储层使用的列表参数
#[derive(Debug, Clone)]
pub struct ProfileListParams {
    pub page: u64,
    pub size: u64,
    pub role: Option<UserRole>,
    pub search: Option<String>,
}

impl From<ProfileListQuery> for ProfileListParams {
    fn from(query: ProfileListQuery) -> Self {
        let (page, size) = query.pagination.normalized();
        Self {
            page,
            size,
            role: query.role,
            search: query
                .search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/profile.ts")]
pub struct UpdateRoleRequest {
    pub role: UserRole,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/profile.ts")]
pub struct AssignTeacherRequest {
    #[serde(default)]
    pub email: Option<String>,
}

// 创建用户（注册、种子管理员）
#[derive(Debug, Clone)]
pub struct CreateProfile {
    pub email: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub role: UserRole,
}
