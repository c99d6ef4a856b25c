use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::tutorials::{ActiveModel, Column, Entity as Tutorials};
use crate::errors::{ArtClubError, Result};
use crate::models::tutorials::{
    entities::{Tutorial, TutorialCategory},
    requests::CreateTutorial,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 新教程排在同分类末尾
    pub async fn create_tutorial_impl(&self, req: CreateTutorial) -> Result<Tutorial> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| ArtClubError::database_operation(format!("开启事务失败: {e}")))?;

        let existing = Tutorials::find()
            .filter(Column::Category.eq(req.category.as_str()))
            .count(&txn)
            .await
            .map_err(|e| ArtClubError::database_operation(format!("统计教程数量失败: {e}")))?;

        let model = ActiveModel {
            title: Set(req.title),
            category: Set(req.category.to_string()),
            video_url: Set(req.video_url),
            order_index: Set(existing as i32),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&txn)
            .await
            .map_err(|e| ArtClubError::database_operation(format!("创建教程失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| ArtClubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.into_tutorial())
    }

    pub async fn get_tutorial_by_id_impl(&self, id: i64) -> Result<Option<Tutorial>> {
        let result = Tutorials::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ArtClubError::database_operation(format!("查询教程失败: {e}")))?;

        Ok(result.map(|m| m.into_tutorial()))
    }

    pub async fn list_tutorials_impl(
        &self,
        category: Option<TutorialCategory>,
    ) -> Result<Vec<Tutorial>> {
        let mut select = Tutorials::find();
        if let Some(category) = category {
            select = select.filter(Column::Category.eq(category.as_str()));
        }

        let tutorials = select
            .order_by_asc(Column::OrderIndex)
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| ArtClubError::database_operation(format!("查询教程列表失败: {e}")))?;

        Ok(tutorials.into_iter().map(|m| m.into_tutorial()).collect())
    }

    pub async fn count_tutorials_by_category_impl(&self) -> Result<HashMap<TutorialCategory, i64>> {
        let rows: Vec<(String, i64)> = Tutorials::find()
            .select_only()
            .column(Column::Category)
            .column_as(Column::Id.count(), "count")
            .group_by(Column::Category)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| ArtClubError::database_operation(format!("统计教程分类失败: {e}")))?;

        Ok(rows
            .into_iter()
            .filter_map(|(category, count)| {
                category
                    .parse::<TutorialCategory>()
                    .ok()
                    .map(|c| (c, count))
            })
            .collect())
    }
}
