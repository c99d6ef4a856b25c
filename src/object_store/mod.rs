//! 对象存储
//!
//! 四个 bucket：avatars / tutorials / posters 公开读取，homework 只能通过签名链接读取。
//! 路径统一用 `/` 分隔，不允许 `..`、绝对路径或空段。

use std::sync::Arc;

use crate::config::AppConfig;
use crate::errors::{ArtClubError, Result};

pub mod local;

pub use local::LocalObjectStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    Avatars,
    Homework,
    Tutorials,
    Posters,
}

impl Bucket {
    pub const ALL: [Bucket; 4] = [
        Bucket::Avatars,
        Bucket::Homework,
        Bucket::Tutorials,
        Bucket::Posters,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Avatars => "avatars",
            Bucket::Homework => "homework",
            Bucket::Tutorials => "tutorials",
            Bucket::Posters => "posters",
        }
    }

    pub fn is_public(&self) -> bool {
        !matches!(self, Bucket::Homework)
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Bucket {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|b| b.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Unknown bucket: {s}"))
    }
}

/// 校验对象路径
pub fn validate_object_path(path: &str) -> Result<()> {
    if path.is_empty() || path.starts_with('/') || path.contains('\\') {
        return Err(ArtClubError::validation(format!("非法对象路径: {path}")));
    }
    if path
        .split('/')
        .any(|seg| seg.is_empty() || seg == "." || seg == "..")
    {
        return Err(ArtClubError::validation(format!("非法对象路径: {path}")));
    }
    Ok(())
}

/// 文件名清洗：只保留字母数字和 `.-_`，其余替换为 `-`
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '-'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches(|c| c == '.' || c == '-').to_string();
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// 写入对象；`upsert` 为 false 且对象已存在时返回冲突错误
    async fn put(&self, bucket: Bucket, path: &str, data: &[u8], upsert: bool) -> Result<()>;
    /// 删除对象，返回实际删除的数量；不存在的路径忽略
    async fn remove(&self, bucket: Bucket, paths: &[String]) -> Result<usize>;
    /// 读取对象，不存在时返回 None
    async fn open(&self, bucket: Bucket, path: &str) -> Result<Option<Vec<u8>>>;
    /// 公开访问链接
    fn public_url(&self, bucket: Bucket, path: &str) -> String;
    /// 限时签名链接
    fn signed_url(&self, bucket: Bucket, path: &str, expires_in: chrono::Duration)
    -> Result<String>;
    /// 校验签名 token 是否授权访问该对象
    fn verify_signature(&self, bucket: Bucket, path: &str, token: &str) -> bool;
    /// 从本存储生成的公开链接中取回对象路径
    fn path_from_public_url(&self, bucket: Bucket, url: &str) -> Option<String>;
}

pub async fn create_object_store() -> Result<Arc<dyn ObjectStore>> {
    let config = AppConfig::get();
    let store = LocalObjectStore::new(
        &config.upload.dir,
        &config.app.public_url,
        &config.jwt.secret,
    )
    .await?;
    Ok(Arc::new(store))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_object_path() {
        assert!(validate_object_path("3/1700000000.pdf").is_ok());
        assert!(validate_object_path("avatar.png").is_ok());
        assert!(validate_object_path("../etc/passwd").is_err());
        assert!(validate_object_path("3/../../x").is_err());
        assert!(validate_object_path("/abs/path").is_err());
        assert!(validate_object_path("a//b").is_err());
        assert!(validate_object_path("").is_err());
        assert!(validate_object_path("a\\b").is_err());
    }

    #[test]
    fn test_bucket_visibility() {
        assert!(Bucket::Avatars.is_public());
        assert!(Bucket::Tutorials.is_public());
        assert!(Bucket::Posters.is_public());
        assert!(!Bucket::Homework.is_public());
        assert_eq!("homework".parse::<Bucket>().unwrap(), Bucket::Homework);
        assert!("secrets".parse::<Bucket>().is_err());
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("My Sketch (final).mp4"), "My-Sketch--final-.mp4");
        assert_eq!(sanitize_file_name("../../x.mp4"), "x.mp4");
        assert_eq!(sanitize_file_name("..."), "file");
    }
}
