use super::SeaOrmStorage;
use crate::entity::posters::{ActiveModel, Column, Entity as Posters};
use crate::errors::{ArtClubError, Result};
use crate::models::posters::{
    entities::Poster,
    requests::{CreatePoster, UpdatePosterRequest},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    pub async fn create_poster_impl(&self, req: CreatePoster) -> Result<Poster> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            title: Set(req.title),
            description: Set(req.description),
            image_url: Set(req.image_url),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| ArtClubError::database_operation(format!("创建海报失败: {e}")))?;

        Ok(result.into_poster())
    }

    pub async fn get_poster_by_id_impl(&self, id: i64) -> Result<Option<Poster>> {
        let result = Posters::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ArtClubError::database_operation(format!("查询海报失败: {e}")))?;

        Ok(result.map(|m| m.into_poster()))
    }

    pub async fn list_posters_impl(&self, active_only: bool) -> Result<Vec<Poster>> {
        let mut select = Posters::find();
        if active_only {
            select = select.filter(Column::IsActive.eq(true));
        }

        let posters = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| ArtClubError::database_operation(format!("查询海报列表失败: {e}")))?;

        Ok(posters.into_iter().map(|m| m.into_poster()).collect())
    }

    pub async fn update_poster_impl(
        &self,
        id: i64,
        update: UpdatePosterRequest,
    ) -> Result<Option<Poster>> {
        if self.get_poster_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(description) = update.description {
            model.description = Set(description);
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| ArtClubError::database_operation(format!("更新海报失败: {e}")))?;

        Ok(Some(updated.into_poster()))
    }

    pub async fn update_poster_image_impl(
        &self,
        id: i64,
        image_url: &str,
    ) -> Result<Option<Poster>> {
        if self.get_poster_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let model = ActiveModel {
            id: Set(id),
            image_url: Set(image_url.to_string()),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| ArtClubError::database_operation(format!("更新海报图片失败: {e}")))?;

        Ok(Some(updated.into_poster()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_active_filter() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let a = storage
            .create_poster_impl(CreatePoster {
                title: "Open studio".into(),
                description: "Every Friday".into(),
                image_url: "http://localhost/a.png".into(),
            })
            .await
            .unwrap();
        storage
            .create_poster_impl(CreatePoster {
                title: "Gallery night".into(),
                description: String::new(),
                image_url: "http://localhost/b.png".into(),
            })
            .await
            .unwrap();

        storage
            .update_poster_impl(
                a.id,
                UpdatePosterRequest {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let active = storage.list_posters_impl(true).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].title, "Gallery night");
        assert_eq!(storage.list_posters_impl(false).await.unwrap().len(), 2);

        let replaced = storage
            .update_poster_image_impl(a.id, "http://localhost/c.png")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(replaced.image_url, "http://localhost/c.png");
        assert_eq!(replaced.title, "Open studio");
    }
}
