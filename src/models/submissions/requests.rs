// 存储层创建参数
#[derive(Debug, Clone)]
pub struct CreateSubmission {
    pub user_id: i64,
    pub lesson_id: i64,
    pub file_path: String,
}
