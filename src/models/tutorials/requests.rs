use serde::Deserialize;
use ts_rs::TS;

use super::entities::TutorialCategory;

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/tutorial.ts")]
pub struct TutorialListQuery {
    pub category: Option<TutorialCategory>,
}

// 存储层创建参数
#[derive(Debug, Clone)]
pub struct CreateTutorial {
    pub title: String,
    pub category: TutorialCategory,
    pub video_url: String,
}
