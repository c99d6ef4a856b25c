use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    /// 后端出错，无法判断是否存在
    ExistsButNoValue,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    /// `ttl` 为 0 时使用默认 TTL
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}

/// 读取 JSON 值；反序列化失败时删除脏数据并视为未命中
pub async fn get_json<T: DeserializeOwned>(cache: &dyn ObjectCache, key: &str) -> Option<T> {
    match cache.get_raw(key).await {
        CacheResult::Found(json) => match serde_json::from_str::<T>(&json) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Invalid cached value for {}: {}", key, e);
                cache.remove(key).await;
                None
            }
        },
        CacheResult::NotFound | CacheResult::ExistsButNoValue => None,
    }
}

pub async fn insert_json<T: Serialize + Sync>(
    cache: &dyn ObjectCache,
    key: &str,
    value: &T,
    ttl: u64,
) {
    match serde_json::to_string(value) {
        Ok(json) => cache.insert_raw(key.to_string(), json, ttl).await,
        Err(e) => tracing::warn!("Failed to serialize cache value for {}: {}", key, e),
    }
}
