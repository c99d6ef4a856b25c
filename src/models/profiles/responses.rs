use serde::Serialize;
use ts_rs::TS;

use super::entities::{Permissions, Profile};
use crate::models::common::PaginationInfo;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/profile.ts")]
pub struct ProfileResponse {
    pub profile: Profile,
    pub permissions: Permissions,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        let permissions = profile.permissions();
        Self {
            profile,
            permissions,
        }
    }
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/profile.ts")]
pub struct ProfileListResponse {
    pub items: Vec<Profile>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/profile.ts")]
pub struct AvatarResponse {
    pub avatar_url: Option<String>,
}
