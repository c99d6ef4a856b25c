//! 存储层测试数据

use super::SeaOrmStorage;
use crate::models::profiles::entities::{Profile, UserRole};
use crate::models::profiles::requests::CreateProfile;
use crate::models::submissions::entities::Submission;
use crate::models::submissions::requests::CreateSubmission;
use crate::models::tutorials::entities::{Tutorial, TutorialCategory};
use crate::models::tutorials::requests::CreateTutorial;

pub(crate) async fn seed_profile(storage: &SeaOrmStorage, email: &str, role: UserRole) -> Profile {
    storage
        .create_profile_impl(CreateProfile {
            email: email.to_string(),
            password_hash: "hash".to_string(),
            full_name: None,
            role,
        })
        .await
        .unwrap()
}

pub(crate) async fn seed_tutorial(
    storage: &SeaOrmStorage,
    title: &str,
    category: TutorialCategory,
) -> Tutorial {
    storage
        .create_tutorial_impl(CreateTutorial {
            title: title.to_string(),
            category,
            video_url: format!("http://localhost/storage/v1/object/public/tutorials/{title}.mp4"),
        })
        .await
        .unwrap()
}

pub(crate) async fn seed_submission(
    storage: &SeaOrmStorage,
    user_id: i64,
    lesson_id: i64,
) -> Submission {
    storage
        .create_submission_impl(CreateSubmission {
            user_id,
            lesson_id,
            file_path: format!("{user_id}/{lesson_id}.pdf"),
        })
        .await
        .unwrap()
}
