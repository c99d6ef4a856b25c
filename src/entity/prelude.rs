//! 预导入模块，方便使用

pub use super::auth_codes::{
    ActiveModel as AuthCodeActiveModel, Entity as AuthCodes, Model as AuthCodeModel,
};
pub use super::competitions::{
    ActiveModel as CompetitionActiveModel, Entity as Competitions, Model as CompetitionModel,
};
pub use super::posters::{ActiveModel as PosterActiveModel, Entity as Posters, Model as PosterModel};
pub use super::profiles::{
    ActiveModel as ProfileActiveModel, Entity as Profiles, Model as ProfileModel,
};
pub use super::reviews::{ActiveModel as ReviewActiveModel, Entity as Reviews, Model as ReviewModel};
pub use super::submissions::{
    ActiveModel as SubmissionActiveModel, Entity as Submissions, Model as SubmissionModel,
};
pub use super::tutorials::{
    ActiveModel as TutorialActiveModel, Entity as Tutorials, Model as TutorialModel,
};
