//! 一次性登录码实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "auth_codes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub code: String,
    pub user_id: i64,
    pub expires_at: i64,
    pub consumed_at: Option<i64>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::profiles::Entity",
        from = "Column::UserId",
        to = "super::profiles::Column::Id"
    )]
    Profile,
}

impl Related<super::profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_auth_code(self) -> crate::models::profiles::entities::AuthCode {
        use super::ts_to_datetime;

        crate::models::profiles::entities::AuthCode {
            id: self.id,
            code: self.code,
            user_id: self.user_id,
            expires_at: ts_to_datetime(self.expires_at),
            consumed_at: self.consumed_at.map(ts_to_datetime),
            created_at: ts_to_datetime(self.created_at),
        }
    }
}
