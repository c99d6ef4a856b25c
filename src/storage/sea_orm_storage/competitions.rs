use super::SeaOrmStorage;
use crate::entity::competitions::{ActiveModel, Column, Entity as Competitions};
use crate::errors::{ArtClubError, Result};
use crate::models::competitions::{
    entities::{Competition, CompetitionStatus},
    requests::CompetitionInput,
};
use crate::storage::CompetitionFilter;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

fn awards_to_json(awards: &[String]) -> Result<String> {
    Ok(serde_json::to_string(awards)?)
}

impl SeaOrmStorage {
    pub async fn create_competition_impl(
        &self,
        input: CompetitionInput,
        created_by: i64,
    ) -> Result<Competition> {
        let now = Utc::now().timestamp();

        let model = ActiveModel {
            title: Set(input.title),
            body: Set(input.body),
            start_at: Set(input.start_at.timestamp()),
            end_at: Set(input.end_at.timestamp()),
            awards: Set(awards_to_json(&input.awards)?),
            published: Set(input.published),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| ArtClubError::database_operation(format!("创建比赛失败: {e}")))?;

        Ok(result.into_competition())
    }

    pub async fn update_competition_impl(
        &self,
        id: i64,
        input: CompetitionInput,
    ) -> Result<Option<Competition>> {
        if self.get_competition_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let model = ActiveModel {
            id: Set(id),
            title: Set(input.title),
            body: Set(input.body),
            start_at: Set(input.start_at.timestamp()),
            end_at: Set(input.end_at.timestamp()),
            awards: Set(awards_to_json(&input.awards)?),
            published: Set(input.published),
            updated_at: Set(Utc::now().timestamp()),
            ..Default::default()
        };

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| ArtClubError::database_operation(format!("更新比赛失败: {e}")))?;

        Ok(Some(updated.into_competition()))
    }

    pub async fn get_competition_by_id_impl(&self, id: i64) -> Result<Option<Competition>> {
        let result = Competitions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| ArtClubError::database_operation(format!("查询比赛失败: {e}")))?;

        Ok(result.map(|m| m.into_competition()))
    }

    /// 按开始时间倒序列出比赛
    pub async fn list_competitions_impl(
        &self,
        filter: CompetitionFilter,
    ) -> Result<Vec<Competition>> {
        let now = filter.now.timestamp();
        let mut select = Competitions::find();

        if !filter.include_unpublished {
            select = select.filter(Column::Published.eq(true));
        }

        // 状态与 Competition::status_at 保持一致
        select = match filter.status {
            Some(CompetitionStatus::Upcoming) => select.filter(Column::StartAt.gt(now)),
            Some(CompetitionStatus::Ongoing) => select
                .filter(Column::StartAt.lte(now))
                .filter(Column::EndAt.gte(now)),
            Some(CompetitionStatus::Ended) => select.filter(Column::EndAt.lt(now)),
            None => select,
        };

        // 区间重叠：start_at <= to 且 end_at >= from
        if let Some(to) = filter.to {
            select = select.filter(Column::StartAt.lte(to.timestamp()));
        }
        if let Some(from) = filter.from {
            select = select.filter(Column::EndAt.gte(from.timestamp()));
        }

        let competitions = select
            .order_by_desc(Column::StartAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| ArtClubError::database_operation(format!("查询比赛列表失败: {e}")))?;

        Ok(competitions
            .into_iter()
            .map(|m| m.into_competition())
            .collect())
    }

    pub async fn list_upcoming_deadlines_impl(
        &self,
        now: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<Competition>> {
        let competitions = Competitions::find()
            .filter(Column::Published.eq(true))
            .filter(Column::EndAt.gte(now.timestamp()))
            .order_by_asc(Column::EndAt)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| ArtClubError::database_operation(format!("查询截止比赛失败: {e}")))?;

        Ok(competitions
            .into_iter()
            .map(|m| m.into_competition())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profiles::entities::UserRole;
    use crate::storage::sea_orm_storage::test_support::seed_profile;
    use chrono::{Duration, TimeZone};

    fn input(title: &str, start: DateTime<Utc>, end: DateTime<Utc>, published: bool) -> CompetitionInput {
        CompetitionInput {
            title: title.to_string(),
            body: String::new(),
            start_at: start,
            end_at: end,
            awards: vec!["Gold".to_string()],
            published,
        }
    }

    #[tokio::test]
    async fn test_status_filters_partition() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let staff = seed_profile(&storage, "lee@artclub.org", UserRole::Staff).await;
        let now = Utc.with_ymd_and_hms(2025, 5, 10, 12, 0, 0).unwrap();
        let d = Duration::days;

        for (title, start, end) in [
            ("past", now - d(20), now - d(10)),
            ("live", now - d(1), now + d(1)),
            ("soon", now + d(3), now + d(9)),
        ] {
            storage
                .create_competition_impl(input(title, start, end, true), staff.id)
                .await
                .unwrap();
        }
        storage
            .create_competition_impl(input("draft", now - d(1), now + d(1), false), staff.id)
            .await
            .unwrap();

        let titles = |items: Vec<Competition>| -> Vec<String> {
            items.into_iter().map(|c| c.title).collect()
        };
        let with_status = |status| CompetitionFilter {
            status,
            now,
            ..Default::default()
        };

        let all = storage.list_competitions_impl(with_status(None)).await.unwrap();
        assert_eq!(titles(all), vec!["soon", "live", "past"]);

        for (status, expected) in [
            (CompetitionStatus::Upcoming, "soon"),
            (CompetitionStatus::Ongoing, "live"),
            (CompetitionStatus::Ended, "past"),
        ] {
            let items = storage
                .list_competitions_impl(with_status(Some(status)))
                .await
                .unwrap();
            assert_eq!(titles(items), vec![expected.to_string()]);
        }

        let managed = storage
            .list_competitions_impl(CompetitionFilter {
                include_unpublished: true,
                now,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(managed.len(), 4);

        let ranged = storage
            .list_competitions_impl(CompetitionFilter {
                from: Some(now + d(2)),
                to: Some(now + d(4)),
                now,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(titles(ranged), vec!["soon"]);

        let deadlines = storage.list_upcoming_deadlines_impl(now, 5).await.unwrap();
        assert_eq!(titles(deadlines), vec!["live", "soon"]);
    }

    #[tokio::test]
    async fn test_awards_round_trip_and_update() {
        let storage = SeaOrmStorage::new_in_memory().await.unwrap();
        let staff = seed_profile(&storage, "max@artclub.org", UserRole::Staff).await;
        let now = Utc::now();
        let created = storage
            .create_competition_impl(input("Ink week", now, now + Duration::days(7), false), staff.id)
            .await
            .unwrap();
        assert_eq!(created.awards, vec!["Gold".to_string()]);

        let mut changed = input("Ink week", now, now + Duration::days(8), true);
        changed.awards = vec!["Gold".into(), "Silver".into()];
        let updated = storage
            .update_competition_impl(created.id, changed)
            .await
            .unwrap()
            .unwrap();
        assert!(updated.published);
        assert_eq!(updated.awards.len(), 2);
        assert_eq!(updated.created_by, staff.id);

        assert!(
            storage
                .update_competition_impl(9999, input("x", now, now, true))
                .await
                .unwrap()
                .is_none()
        );
    }
}
