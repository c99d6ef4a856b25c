use std::collections::HashMap;
use std::sync::Arc;

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

use crate::errors::Result;

pub mod sea_orm_storage;

/// 比赛列表过滤条件
#[derive(Debug, Clone, Default)]
pub struct CompetitionFilter {
    /// 是否包含未发布的比赛（管理端）
    pub include_unpublished: bool,
    pub status: Option<crate::models::competitions::entities::CompetitionStatus>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub now: DateTime<Utc>,
}

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户资料
    // 创建用户
    async fn create_profile(&self, profile: CreateProfile) -> Result<Profile>;
    // 通过ID获取用户
    async fn get_profile_by_id(&self, id: i64) -> Result<Option<Profile>>;
    // 通过邮箱获取用户
    async fn get_profile_by_email(&self, email: &str) -> Result<Option<Profile>>;
    // 分页列出用户
    async fn list_profiles_with_pagination(
        &self,
        params: ProfileListParams,
    ) -> Result<ProfileListResponse>;
    // 更新姓名
    async fn update_profile_name(
        &self,
        id: i64,
        full_name: Option<String>,
    ) -> Result<Option<Profile>>;
    // 更新头像链接
    async fn update_avatar_url(&self, id: i64, avatar_url: Option<String>)
    -> Result<Option<Profile>>;
    // 修改角色
    async fn update_role(&self, id: i64, role: UserRole) -> Result<Option<Profile>>;
    // 更新最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 用户总数
    async fn count_profiles(&self) -> Result<u64>;

    /// 一次性登录码
    async fn create_auth_code(
        &self,
        user_id: i64,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<AuthCode>;
    // 消费登录码：未使用且未过期时标记为已用并返回
    async fn consume_auth_code(&self, code: &str, now: DateTime<Utc>) -> Result<Option<AuthCode>>;

    /// 教程
    async fn create_tutorial(&self, tutorial: CreateTutorial) -> Result<Tutorial>;
    async fn get_tutorial_by_id(&self, id: i64) -> Result<Option<Tutorial>>;
    async fn list_tutorials(&self, category: Option<TutorialCategory>) -> Result<Vec<Tutorial>>;
    // 各分类教程数量
    async fn count_tutorials_by_category(&self) -> Result<HashMap<TutorialCategory, i64>>;

    /// 作业提交
    async fn create_submission(&self, submission: CreateSubmission) -> Result<Submission>;
    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>>;
    // 带课程、学员、评分的提交列表；user_id 为空时返回全部
    async fn list_submission_details(&self, user_id: Option<i64>)
    -> Result<Vec<SubmissionDetail>>;

    /// 评分
    // 按 submission_id upsert，返回评分及是否新建
    async fn upsert_review(&self, review: UpsertReview) -> Result<(Review, bool)>;
    async fn get_review_by_submission(&self, submission_id: i64) -> Result<Option<Review>>;

    /// 比赛
    async fn create_competition(
        &self,
        input: CompetitionInput,
        created_by: i64,
    ) -> Result<Competition>;
    async fn update_competition(
        &self,
        id: i64,
        input: CompetitionInput,
    ) -> Result<Option<Competition>>;
    async fn get_competition_by_id(&self, id: i64) -> Result<Option<Competition>>;
    async fn list_competitions(&self, filter: CompetitionFilter) -> Result<Vec<Competition>>;
    // 尚未结束的已发布比赛，按截止时间升序
    async fn list_upcoming_deadlines(
        &self,
        now: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<Competition>>;

    /// 海报
    async fn create_poster(&self, poster: CreatePoster) -> Result<Poster>;
    async fn get_poster_by_id(&self, id: i64) -> Result<Option<Poster>>;
    async fn list_posters(&self, active_only: bool) -> Result<Vec<Poster>>;
    async fn update_poster(&self, id: i64, update: UpdatePosterRequest) -> Result<Option<Poster>>;
    async fn update_poster_image(&self, id: i64, image_url: &str) -> Result<Option<Poster>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
