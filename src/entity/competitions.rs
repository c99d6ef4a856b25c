//! 比赛实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "competitions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub body: String,
    pub start_at: i64,
    pub end_at: i64,
    /// JSON 字符串数组
    #[sea_orm(column_type = "Text")]
    pub awards: String,
    pub published: bool,
    pub created_by: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::profiles::Entity",
        from = "Column::CreatedBy",
        to = "super::profiles::Column::Id"
    )]
    Creator,
}

impl Related<super::profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Creator.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_competition(self) -> crate::models::competitions::entities::Competition {
        use super::ts_to_datetime;

        crate::models::competitions::entities::Competition {
            id: self.id,
            title: self.title,
            body: self.body,
            start_at: ts_to_datetime(self.start_at),
            end_at: ts_to_datetime(self.end_at),
            awards: serde_json::from_str(&self.awards).unwrap_or_default(),
            published: self.published,
            created_by: self.created_by,
            created_at: ts_to_datetime(self.created_at),
            updated_at: ts_to_datetime(self.updated_at),
        }
    }
}
