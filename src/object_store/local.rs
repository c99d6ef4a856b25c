use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use super::{Bucket, ObjectStore, validate_object_path};
use crate::errors::{ArtClubError, Result};
use crate::utils::jwt::{sign_object_token, verify_object_token};

const PUBLIC_PREFIX: &str = "/storage/v1/object/public";
const SIGN_PREFIX: &str = "/storage/v1/object/sign";

/// 本地目录对象存储：`{root}/{bucket}/{path}`
pub struct LocalObjectStore {
    root: PathBuf,
    public_url: String,
    secret: String,
}

impl LocalObjectStore {
    pub async fn new(root: impl AsRef<Path>, public_url: &str, secret: &str) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        for bucket in Bucket::ALL {
            fs::create_dir_all(root.join(bucket.as_str())).await?;
        }
        Ok(Self {
            root,
            public_url: public_url.trim_end_matches('/').to_string(),
            secret: secret.to_string(),
        })
    }

    fn object_path(&self, bucket: Bucket, path: &str) -> Result<PathBuf> {
        validate_object_path(path)?;
        Ok(self.root.join(bucket.as_str()).join(path))
    }
}

#[async_trait::async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put(&self, bucket: Bucket, path: &str, data: &[u8], upsert: bool) -> Result<()> {
        let target = self.object_path(bucket, path)?;
        if !upsert && fs::try_exists(&target).await? {
            return Err(ArtClubError::conflict(format!("对象已存在: {bucket}/{path}")));
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&target, data)
            .await
            .map_err(|e| ArtClubError::object_store(format!("写入对象失败 {bucket}/{path}: {e}")))?;
        debug!("Stored object {}/{} ({} bytes)", bucket, path, data.len());
        Ok(())
    }

    async fn remove(&self, bucket: Bucket, paths: &[String]) -> Result<usize> {
        let mut removed = 0;
        for path in paths {
            let target = self.object_path(bucket, path)?;
            match fs::remove_file(&target).await {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(ArtClubError::object_store(format!(
                        "删除对象失败 {bucket}/{path}: {e}"
                    )));
                }
            }
        }
        Ok(removed)
    }

    async fn open(&self, bucket: Bucket, path: &str) -> Result<Option<Vec<u8>>> {
        let target = self.object_path(bucket, path)?;
        match fs::read(&target).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ArtClubError::object_store(format!(
                "读取对象失败 {bucket}/{path}: {e}"
            ))),
        }
    }

    fn public_url(&self, bucket: Bucket, path: &str) -> String {
        format!("{}{PUBLIC_PREFIX}/{bucket}/{path}", self.public_url)
    }

    fn signed_url(
        &self,
        bucket: Bucket,
        path: &str,
        expires_in: chrono::Duration,
    ) -> Result<String> {
        validate_object_path(path)?;
        let token = sign_object_token(&self.secret, bucket.as_str(), path, expires_in)?;
        Ok(format!(
            "{}{SIGN_PREFIX}/{bucket}/{path}?token={token}",
            self.public_url
        ))
    }

    fn verify_signature(&self, bucket: Bucket, path: &str, token: &str) -> bool {
        verify_object_token(&self.secret, token, bucket.as_str(), path).is_ok()
    }

    fn path_from_public_url(&self, bucket: Bucket, url: &str) -> Option<String> {
        let prefix = format!("{}{PUBLIC_PREFIX}/{bucket}/", self.public_url);
        let path = url.strip_prefix(&prefix)?;
        validate_object_path(path).ok()?;
        Some(path.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn temp_store(name: &str) -> (LocalObjectStore, PathBuf) {
        let root = std::env::temp_dir().join(format!(
            "artclub-store-{name}-{}",
            uuid::Uuid::new_v4()
        ));
        let store = LocalObjectStore::new(&root, "http://localhost:8080/", "test-secret")
            .await
            .unwrap();
        (store, root)
    }

    #[tokio::test]
    async fn test_put_open_remove() {
        let (store, root) = temp_store("basic").await;

        store
            .put(Bucket::Homework, "3/1700000000.pdf", b"%PDF-1.7", false)
            .await
            .unwrap();
        let data = store.open(Bucket::Homework, "3/1700000000.pdf").await.unwrap();
        assert_eq!(data.as_deref(), Some(&b"%PDF-1.7"[..]));

        // 不允许覆盖
        assert!(
            store
                .put(Bucket::Homework, "3/1700000000.pdf", b"x", false)
                .await
                .is_err()
        );
        store
            .put(Bucket::Homework, "3/1700000000.pdf", b"%PDF-2.0", true)
            .await
            .unwrap();

        let removed = store
            .remove(
                Bucket::Homework,
                &["3/1700000000.pdf".to_string(), "3/missing.pdf".to_string()],
            )
            .await
            .unwrap();
        assert_eq!(removed, 1);
        assert!(store.open(Bucket::Homework, "3/1700000000.pdf").await.unwrap().is_none());

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn test_rejects_traversal() {
        let (store, root) = temp_store("traversal").await;
        assert!(store.put(Bucket::Avatars, "../escape.png", b"x", true).await.is_err());
        assert!(store.open(Bucket::Avatars, "a/../../b").await.is_err());
        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn test_urls() {
        let (store, root) = temp_store("urls").await;

        let url = store.public_url(Bucket::Avatars, "7/avatar.png");
        assert_eq!(
            url,
            "http://localhost:8080/storage/v1/object/public/avatars/7/avatar.png"
        );
        assert_eq!(
            store.path_from_public_url(Bucket::Avatars, &url).as_deref(),
            Some("7/avatar.png")
        );
        assert!(store.path_from_public_url(Bucket::Posters, &url).is_none());

        let signed = store
            .signed_url(Bucket::Homework, "7/1.pdf", chrono::Duration::seconds(600))
            .unwrap();
        let token = signed.split("token=").nth(1).unwrap();
        assert!(store.verify_signature(Bucket::Homework, "7/1.pdf", token));
        assert!(!store.verify_signature(Bucket::Homework, "8/1.pdf", token));

        let _ = std::fs::remove_dir_all(root);
    }
}
