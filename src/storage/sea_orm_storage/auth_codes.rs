use super::SeaOrmStorage;
use crate::entity::auth_codes::{ActiveModel, Column, Entity as AuthCodes};
use crate::errors::{ArtClubError, Result};
use crate::models::profiles::entities::AuthCode;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, Set};

impl SeaOrmStorage {
    pub async fn create_auth_code_impl(
        &self,
        user_id: i64,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<AuthCode> {
        let now = Utc::now().timestamp();

        // 发新码时顺带清理该用户已用或已过期的旧码，未过期的旧码仍可使用
        AuthCodes::delete_many()
            .filter(Column::UserId.eq(user_id))
            .filter(
                Condition::any()
                    .add(Column::ConsumedAt.is_not_null())
                    .add(Column::ExpiresAt.lte(now)),
            )
            .exec(&self.db)
            .await
            .map_err(|e| ArtClubError::database_operation(format!("清理登录码失败: {e}")))?;

        let model = ActiveModel {
            code: Set(code.to_string()),
            user_id: Set(user_id),
            expires_at: Set(expires_at.timestamp()),
            consumed_at: Set(None),
            created_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| ArtClubError::database_operation(format!("创建登录码失败: {e}")))?;

        Ok(result.into_auth_code())
    }

    /// 条件更新保证同一个码只能被消费一次
    pub async fn consume_auth_code_impl(
        &self,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<AuthCode>> {
        let ts = now.timestamp();

        let result = AuthCodes::update_many()
            .col_expr(Column::ConsumedAt, Expr::value(ts))
            .filter(Column::Code.eq(code))
            .filter(Column::ConsumedAt.is_null())
            .filter(Column::ExpiresAt.gt(ts))
            .exec(&self.db)
            .await
            .map_err(|e| ArtClubError::database_operation(format!("消费登录码失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        let consumed = AuthCodes::find()
            .filter(Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(|e| ArtClubError::database_operation(format!("查询登录码失败: {e}")))?;

        Ok(consumed.map(|m| m.into_auth_code()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profiles::entities::UserRole;
    use crate::storage::sea_orm_storage::test_support::seed_profile;
    use chrono::Duration;
    use sea_orm::PaginatorTrait;

    #[tokio::test]
    async fn test_code_is_single_use() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let p = seed_profile(&storage, "dora@artclub.org", UserRole::Student).await;
        let now = Utc::now();
        storage
            .create_auth_code_impl(p.id, "code-1", now + Duration::minutes(15))
            .await
            .unwrap();

        let first = storage.consume_auth_code_impl("code-1", now).await.unwrap();
        assert_eq!(first.map(|c| c.user_id), Some(p.id));
        assert!(storage.consume_auth_code_impl("code-1", now).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_code_rejected() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let p = seed_profile(&storage, "eli@artclub.org", UserRole::Student).await;
        let now = Utc::now();
        storage
            .create_auth_code_impl(p.id, "code-2", now - Duration::minutes(1))
            .await
            .unwrap();

        assert!(storage.consume_auth_code_impl("code-2", now).await.unwrap().is_none());
        assert!(storage.consume_auth_code_impl("unknown", now).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_new_code_purges_used_and_expired() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let p = seed_profile(&storage, "finn@artclub.org", UserRole::Student).await;
        let other = seed_profile(&storage, "gia@artclub.org", UserRole::Student).await;
        let now = Utc::now();

        storage
            .create_auth_code_impl(p.id, "used", now + Duration::minutes(15))
            .await
            .unwrap();
        storage.consume_auth_code_impl("used", now).await.unwrap();
        storage
            .create_auth_code_impl(p.id, "stale", now - Duration::minutes(1))
            .await
            .unwrap();
        storage
            .create_auth_code_impl(p.id, "pending", now + Duration::minutes(15))
            .await
            .unwrap();
        storage
            .create_auth_code_impl(other.id, "other-stale", now - Duration::minutes(1))
            .await
            .unwrap();

        storage
            .create_auth_code_impl(p.id, "fresh", now + Duration::minutes(15))
            .await
            .unwrap();

        let mut left: Vec<String> = AuthCodes::find()
            .all(&storage.db)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.code)
            .collect();
        left.sort();
        assert_eq!(left, vec!["fresh", "other-stale", "pending"]);
        assert_eq!(
            AuthCodes::find()
                .filter(Column::UserId.eq(p.id))
                .count(&storage.db)
                .await
                .unwrap(),
            2
        );
        // 未过期的旧码仍然有效
        assert!(storage.consume_auth_code_impl("pending", now).await.unwrap().is_some());
    }
}
