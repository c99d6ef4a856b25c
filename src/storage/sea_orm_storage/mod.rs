//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod auth_codes;
mod competitions;
mod posters;
mod profiles;
mod reviews;
mod submissions;
mod tutorials;

#[cfg(test)]
pub(crate) mod test_support;

use crate::config::AppConfig;
use crate::errors::{ArtClubError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| ArtClubError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// 内存 SQLite，单连接保证所有查询落在同一个库上
    #[cfg(test)]
    pub(crate) async fn new_in_memory() -> Result<Self> {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(opt)
            .await
            .map_err(|e| ArtClubError::database_connection(format!("SQLite 连接失败: {e}")))?;
        Migrator::up(&db, None)
            .await
            .map_err(|e| ArtClubError::database_operation(format!("数据库迁移失败: {e}")))?;
        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| ArtClubError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| ArtClubError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| ArtClubError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(ArtClubError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::models::{
    competitions::{entities::Competition, requests::CompetitionInput},
    posters::{
        entities::Poster,
        requests::{CreatePoster, UpdatePosterRequest},
    },
    profiles::{
        entities::{AuthCode, Profile, UserRole},
        requests::{CreateProfile, ProfileListParams},
        responses::ProfileListResponse,
    },
    reviews::{entities::Review, requests::UpsertReview},
    submissions::{
        entities::{Submission, SubmissionDetail},
        requests::CreateSubmission,
    },
    tutorials::{
        entities::{Tutorial, TutorialCategory},
        requests::CreateTutorial,
    },
};
use crate::storage::{CompetitionFilter, Storage};
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户资料模块
    async fn create_profile(&self, profile: CreateProfile) -> Result<Profile> {
        self.create_profile_impl(profile).await
    }

    async fn get_profile_by_id(&self, id: i64) -> Result<Option<Profile>> {
        self.get_profile_by_id_impl(id).await
    }

    async fn get_profile_by_email(&self, email: &str) -> Result<Option<Profile>> {
        self.get_profile_by_email_impl(email).await
    }

    async fn list_profiles_with_pagination(
        &self,
        params: ProfileListParams,
    ) -> Result<ProfileListResponse> {
        self.list_profiles_with_pagination_impl(params).await
    }

    async fn update_profile_name(
        &self,
        id: i64,
        full_name: Option<String>,
    ) -> Result<Option<Profile>> {
        self.update_profile_name_impl(id, full_name).await
    }

    async fn update_avatar_url(
        &self,
        id: i64,
        avatar_url: Option<String>,
    ) -> Result<Option<Profile>> {
        self.update_avatar_url_impl(id, avatar_url).await
    }

    async fn update_role(&self, id: i64, role: UserRole) -> Result<Option<Profile>> {
        self.update_role_impl(id, role).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_profiles(&self) -> Result<u64> {
        self.count_profiles_impl().await
    }

    // 登录码模块
    async fn create_auth_code(
        &self,
        user_id: i64,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<AuthCode> {
        self.create_auth_code_impl(user_id, code, expires_at).await
    }

    async fn consume_auth_code(&self, code: &str, now: DateTime<Utc>) -> Result<Option<AuthCode>> {
        self.consume_auth_code_impl(code, now).await
    }

    // 教程模块
    async fn create_tutorial(&self, tutorial: CreateTutorial) -> Result<Tutorial> {
        self.create_tutorial_impl(tutorial).await
    }

    async fn get_tutorial_by_id(&self, id: i64) -> Result<Option<Tutorial>> {
        self.get_tutorial_by_id_impl(id).await
    }

    async fn list_tutorials(&self, category: Option<TutorialCategory>) -> Result<Vec<Tutorial>> {
        self.list_tutorials_impl(category).await
    }

    async fn count_tutorials_by_category(&self) -> Result<HashMap<TutorialCategory, i64>> {
        self.count_tutorials_by_category_impl().await
    }

    // 提交模块
    async fn create_submission(&self, submission: CreateSubmission) -> Result<Submission> {
        self.create_submission_impl(submission).await
    }

    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>> {
        self.get_submission_by_id_impl(id).await
    }

    async fn list_submission_details(
        &self,
        user_id: Option<i64>,
    ) -> Result<Vec<SubmissionDetail>> {
        self.list_submission_details_impl(user_id).await
    }

    // 评分模块
    async fn upsert_review(&self, review: UpsertReview) -> Result<(Review, bool)> {
        self.upsert_review_impl(review).await
    }

    async fn get_review_by_submission(&self, submission_id: i64) -> Result<Option<Review>> {
        self.get_review_by_submission_impl(submission_id).await
    }

    // 比赛模块
    async fn create_competition(
        &self,
        input: CompetitionInput,
        created_by: i64,
    ) -> Result<Competition> {
        self.create_competition_impl(input, created_by).await
    }

    async fn update_competition(
        &self,
        id: i64,
        input: CompetitionInput,
    ) -> Result<Option<Competition>> {
        self.update_competition_impl(id, input).await
    }

    async fn get_competition_by_id(&self, id: i64) -> Result<Option<Competition>> {
        self.get_competition_by_id_impl(id).await
    }

    async fn list_competitions(&self, filter: CompetitionFilter) -> Result<Vec<Competition>> {
        self.list_competitions_impl(filter).await
    }

    async fn list_upcoming_deadlines(
        &self,
        now: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<Competition>> {
        self.list_upcoming_deadlines_impl(now, limit).await
    }

    // 海报模块
    async fn create_poster(&self, poster: CreatePoster) -> Result<Poster> {
        self.create_poster_impl(poster).await
    }

    async fn get_poster_by_id(&self, id: i64) -> Result<Option<Poster>> {
        self.get_poster_by_id_impl(id).await
    }

    async fn list_posters(&self, active_only: bool) -> Result<Vec<Poster>> {
        self.list_posters_impl(active_only).await
    }

    async fn update_poster(&self, id: i64, update: UpdatePosterRequest) -> Result<Option<Poster>> {
        self.update_poster_impl(id, update).await
    }

    async fn update_poster_image(&self, id: i64, image_url: &str) -> Result<Option<Poster>> {
        self.update_poster_image_impl(id, image_url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("artclub.db").unwrap(),
            "sqlite://artclub.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("postgres://u:p@localhost/artclub").unwrap(),
            "postgres://u:p@localhost/artclub"
        );
        assert!(SeaOrmStorage::build_database_url("artclub").is_err());
    }
}
