use super::SeaOrmStorage;
use crate::entity::profiles::{ActiveModel, Column, Entity as Profiles};
use crate::errors::{ArtClubError, Result};
use crate::models::{
    PaginationInfo,
    profiles::{
        entities::{Profile, UserRole},
        requests::{CreateProfile, ProfileListParams},
        responses::ProfileListResponse,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::sea_query::{Expr, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set, SqlErr,
};

impl SeaOrmStorage {
    /// 创建用户
    pub async fn create_profile_impl(&self, req: CreateProfile) -> Result<Profile> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            email: Set(req.email.trim().to_lowercase()),
            password_hash: Set(req.password_hash),
            full_name: Set(req.full_name),
            avatar_url: Set(None),
            role: Set(req.role.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                ArtClubError::conflict("Email already exists")
            }
            _ => ArtClubError::database_operation(format!("创建用户失败: {e}")),
        })?;

        Ok(result.into_profile())
    }

    /// 通过 ID 获取用户
    pub async fn get_profile_by_id_impl(&self, id: i64) -> Result<Option<Profile>> {
        let result = Profiles::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ArtClubError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_profile()))
    }

    /// 通过邮箱获取用户（不区分大小写，入库时统一小写）
    pub async fn get_profile_by_email_impl(&self, email: &str) -> Result<Option<Profile>> {
        let result = Profiles::find()
            .filter(Column::Email.eq(email.trim().to_lowercase()))
            .one(&self.db)
            .await
            .map_err(|e| ArtClubError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_profile()))
    }

    /// 分页列出用户
    pub async fn list_profiles_with_pagination_impl(
        &self,
        params: ProfileListParams,
    ) -> Result<ProfileListResponse> {
        let mut select = Profiles::find();

        // 搜索条件
        if let Some(ref search) = params.search {
            let pattern = format!("%{}%", escape_like_pattern(search));
            select = select.filter(
                Condition::any()
                    .add(Column::Email.like(LikeExpr::new(pattern.clone()).escape('\\')))
                    .add(Column::FullName.like(LikeExpr::new(pattern).escape('\\'))),
            );
        }

        // 角色筛选
        if let Some(role) = params.role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }

        select = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, params.size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| ArtClubError::database_operation(format!("查询用户总数失败: {e}")))?;

        let profiles = paginator
            .fetch_page(params.page - 1)
            .await
            .map_err(|e| ArtClubError::database_operation(format!("查询用户列表失败: {e}")))?;

        Ok(ProfileListResponse {
            items: profiles.into_iter().map(|m| m.into_profile()).collect(),
            pagination: PaginationInfo::new(params.page, params.size, total),
        })
    }

    /// 更新单个用户并返回最新数据，用户不存在时返回 None
    async fn update_profile_with(
        &self,
        id: i64,
        apply: impl FnOnce(&mut ActiveModel),
    ) -> Result<Option<Profile>> {
        if self.get_profile_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };
        apply(&mut model);

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| ArtClubError::database_operation(format!("更新用户失败: {e}")))?;

        Ok(Some(updated.into_profile()))
    }

    pub async fn update_profile_name_impl(
        &self,
        id: i64,
        full_name: Option<String>,
    ) -> Result<Option<Profile>> {
        self.update_profile_with(id, |m| m.full_name = Set(full_name))
            .await
    }

    pub async fn update_avatar_url_impl(
        &self,
        id: i64,
        avatar_url: Option<String>,
    ) -> Result<Option<Profile>> {
        self.update_profile_with(id, |m| m.avatar_url = Set(avatar_url))
            .await
    }

    pub async fn update_role_impl(&self, id: i64, role: UserRole) -> Result<Option<Profile>> {
        self.update_profile_with(id, |m| m.role = Set(role.to_string()))
            .await
    }

    /// 更新用户最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Profiles::update_many()
            .col_expr(Column::LastLogin, Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| ArtClubError::database_operation(format!("更新最后登录时间失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 统计用户数量
    pub async fn count_profiles_impl(&self) -> Result<u64> {
        let count = Profiles::find()
            .count(&self.db)
            .await
            .map_err(|e| ArtClubError::database_operation(format!("统计用户数量失败: {e}")))?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::test_support::seed_profile as seed;

    #[tokio::test]
    async fn test_create_and_find_by_email() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let created = seed(&storage, "Mia@ArtClub.org", UserRole::Student).await;
        assert_eq!(created.email, "mia@artclub.org");

        let found = storage
            .get_profile_by_email_impl("MIA@artclub.org")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.role, UserRole::Student);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        seed(&storage, "dup@artclub.org", UserRole::Student).await;
        let second = storage
            .create_profile_impl(CreateProfile {
                email: "dup@artclub.org".to_string(),
                password_hash: "hash".to_string(),
                full_name: None,
                role: UserRole::Student,
            })
            .await;
        assert!(matches!(second, Err(ArtClubError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_list_with_role_and_escaped_search() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        seed(&storage, "anna@artclub.org", UserRole::Student).await;
        seed(&storage, "ben@artclub.org", UserRole::Staff).await;
        seed(&storage, "100percent@artclub.org", UserRole::Student).await;

        let students = storage
            .list_profiles_with_pagination_impl(ProfileListParams {
                page: 1,
                size: 10,
                role: Some(UserRole::Student),
                search: None,
            })
            .await
            .unwrap();
        assert_eq!(students.pagination.total, 2);

        // `%` 按字面匹配，不应命中所有人
        let literal = storage
            .list_profiles_with_pagination_impl(ProfileListParams {
                page: 1,
                size: 10,
                role: None,
                search: Some("%".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(literal.pagination.total, 0);

        let by_name = storage
            .list_profiles_with_pagination_impl(ProfileListParams {
                page: 1,
                size: 10,
                role: None,
                search: Some("ben".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(by_name.items.len(), 1);
    }

    #[tokio::test]
    async fn test_update_role_and_missing_profile() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let p = seed(&storage, "cleo@artclub.org", UserRole::Student).await;

        let updated = storage
            .update_role_impl(p.id, UserRole::Staff)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.role, UserRole::Staff);
        assert!(storage.update_role_impl(9999, UserRole::Staff).await.unwrap().is_none());
    }
}
