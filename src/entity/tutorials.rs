//! 教程实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tutorials")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub category: String,
    pub video_url: String,
    pub order_index: i32,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::submissions::Entity")]
    Submissions,
}

impl Related<super::submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_tutorial(self) -> crate::models::tutorials::entities::Tutorial {
        use crate::models::tutorials::entities::{Tutorial, TutorialCategory};

        Tutorial {
            id: self.id,
            title: self.title,
            category: self
                .category
                .parse::<TutorialCategory>()
                .unwrap_or(TutorialCategory::Sketching),
            video_url: self.video_url,
            order_index: self.order_index,
            created_at: super::ts_to_datetime(self.created_at),
        }
    }
}
