pub mod auth;
pub mod common;
pub mod competitions;
pub mod posters;
pub mod profiles;
pub mod realtime;
pub mod reviews;
pub mod stats;
pub mod submissions;
pub mod system;
pub mod tutorials;

pub use common::{ApiResponse, PaginatedResponse, PaginationInfo, PaginationQuery};

/// 程序启动时间，用于健康检查中的运行时长
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 业务错误码，随 ApiResponse.code 返回
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    InternalServerError = 1005,
    RateLimitExceeded = 1029,

    // 认证
    AuthFailed = 2000,
    RegisterFailed = 2001,
    AuthCodeInvalid = 2002,

    // 用户资料
    UserNotFound = 3000,
    UserEmailInvalid = 3001,
    UserEmailAlreadyExists = 3002,
    UserPasswordInvalid = 3003,
    UserNameInvalid = 3004,
    UserUpdateFailed = 3005,
    UserRoleInvalid = 3006,

    // 文件
    FileNotFound = 4000,
    FileUploadFailed = 4001,
    FileTypeNotAllowed = 4002,
    FileSizeExceeded = 4003,
    MultifileUploadNotAllowed = 4004,

    // 教程
    TutorialNotFound = 5000,
    TutorialCategoryInvalid = 5001,

    // 作业与评分
    SubmissionNotFound = 6000,
    ReviewScoreInvalid = 6001,

    // 比赛
    CompetitionNotFound = 7000,
    CompetitionDateInvalid = 7001,

    // 海报
    PosterNotFound = 8000,
}
