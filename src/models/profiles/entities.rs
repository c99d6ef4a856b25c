use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 用户角色
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/profile.ts")]
pub enum UserRole {
    Admin,   // 管理员
    Staff,   // 老师
    Student, // 学员
}

impl UserRole {
    pub const ADMIN: &'static str = "admin";
    pub const STAFF: &'static str = "staff";
    pub const STUDENT: &'static str = "student";

    pub fn admin_roles() -> &'static [&'static UserRole] {
        &[&Self::Admin]
    }
    pub fn staff_roles() -> &'static [&'static UserRole] {
        &[&Self::Staff, &Self::Admin]
    }
    pub fn student_roles() -> &'static [&'static UserRole] {
        &[&Self::Student]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => Self::ADMIN,
            UserRole::Staff => Self::STAFF,
            UserRole::Student => Self::STUDENT,
        }
    }

    pub fn is_staff_or_admin(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Staff)
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<UserRole>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的用户角色: '{s}'. 支持的角色: admin, staff, student"
            ))
        })
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            UserRole::ADMIN => Ok(UserRole::Admin),
            UserRole::STAFF => Ok(UserRole::Staff),
            UserRole::STUDENT => Ok(UserRole::Student),
            _ => Err(format!("Invalid user role: {s}")),
        }
    }
}

/// 由角色推导出的操作权限，前端据此只渲染允许的控件
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/profile.ts")]
pub struct Permissions {
    pub can_manage_users: bool,
    pub can_manage_posters: bool,
    pub can_grade: bool,
    pub can_upload_tutorials: bool,
    pub can_manage_competitions: bool,
    pub can_submit_homework: bool,
}

impl Permissions {
    pub fn for_role(role: UserRole) -> Self {
        let is_admin = role == UserRole::Admin;
        let is_staff = role.is_staff_or_admin();
        Self {
            can_manage_users: is_admin,
            can_manage_posters: is_admin,
            can_grade: is_staff,
            can_upload_tutorials: is_staff,
            can_manage_competitions: is_staff,
            can_submit_homework: role == UserRole::Student,
        }
    }
}

// 用户资料
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/profile.ts")]
pub struct Profile {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    #[ts(skip)]
    pub password_hash: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub role: UserRole,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Profile {
    pub fn permissions(&self) -> Permissions {
        Permissions::for_role(self.role)
    }

    // 生成 token 对（access + refresh）
    pub fn generate_token_pair(
        &self,
        refresh_token_expiry: Option<chrono::TimeDelta>,
    ) -> Result<crate::utils::jwt::TokenPair, String> {
        crate::utils::jwt::JwtUtils::generate_token_pair(
            self.id,
            self.role.as_str(),
            refresh_token_expiry,
        )
        .map_err(|e| format!("生成 token 对失败: {e}"))
    }
}

/// 一次性登录码
#[derive(Debug, Clone)]
pub struct AuthCode {
    pub id: i64,
    pub code: String,
    pub user_id: i64,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub consumed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_has_no_management_permission() {
        let perms = Permissions::for_role(UserRole::Student);
        assert!(!perms.can_manage_users);
        assert!(!perms.can_manage_posters);
        assert!(!perms.can_grade);
        assert!(!perms.can_upload_tutorials);
        assert!(!perms.can_manage_competitions);
        assert!(perms.can_submit_homework);
    }

    #[test]
    fn test_staff_permissions() {
        let perms = Permissions::for_role(UserRole::Staff);
        assert!(perms.can_grade);
        assert!(perms.can_upload_tutorials);
        assert!(perms.can_manage_competitions);
        assert!(!perms.can_manage_users);
        assert!(!perms.can_manage_posters);
        assert!(!perms.can_submit_homework);
    }

    #[test]
    fn test_admin_permissions() {
        let perms = Permissions::for_role(UserRole::Admin);
        assert!(perms.can_manage_users);
        assert!(perms.can_manage_posters);
        assert!(perms.can_grade);
        assert!(!perms.can_submit_homework);
    }

    #[test]
    fn test_role_parse_and_serialize() {
        assert_eq!("staff".parse::<UserRole>().unwrap(), UserRole::Staff);
        assert!("teacher".parse::<UserRole>().is_err());
        assert_eq!(serde_json::to_string(&UserRole::Student).unwrap(), "\"student\"");
        let role: UserRole = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, UserRole::Admin);
        assert!(serde_json::from_str::<UserRole>("\"root\"").is_err());
    }
}
