//! Redis 缓存后端
//!
//! 多实例部署时共享登录用户资料缓存。所有键都带 `cache.redis.key_prefix` 前缀，
//! 清空缓存只影响本应用的键。连接复用一条多路复用连接，断线后下次访问时重连。

use async_trait::async_trait;
use redis::{AsyncCommands, RedisError, aio::MultiplexedConnection};
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;

declare_object_cache_plugin!("redis", RedisObjectCache);

pub struct RedisObjectCache {
    client: redis::Client,
    connection: Mutex<Option<MultiplexedConnection>>,
    key_prefix: String,
    default_ttl: u64,
}

/// 启动时同步 PING 一次，连不上就让启动流程回退到 moka
fn ping(client: &redis::Client, url: &str) -> Result<(), String> {
    let reply = client
        .get_connection()
        .and_then(|mut conn| redis::cmd("PING").query::<String>(&mut conn));
    match reply {
        Ok(reply) => {
            debug!("Redis at {} answered {}", url, reply);
            Ok(())
        }
        Err(e) => {
            error!("Redis at {} is unreachable: {}", url, e);
            Err(format!("Redis ping failed: {e}"))
        }
    }
}

impl RedisObjectCache {
    pub fn new() -> Result<Self, String> {
        let config = AppConfig::get();
        let redis = &config.cache.redis;

        let client = redis::Client::open(redis.url.clone())
            .map_err(|e| format!("Invalid Redis URL '{}': {e}", redis.url))?;
        ping(&client, &redis.url)?;

        debug!(
            "Redis cache ready, prefix '{}', default TTL {}s",
            redis.key_prefix, config.cache.default_ttl
        );
        Ok(Self::with_client(
            client,
            &redis.key_prefix,
            config.cache.default_ttl,
        ))
    }

    fn with_client(client: redis::Client, key_prefix: &str, default_ttl: u64) -> Self {
        Self {
            client,
            connection: Mutex::new(None),
            key_prefix: key_prefix.to_string(),
            default_ttl,
        }
    }

    async fn connection(&self) -> Option<MultiplexedConnection> {
        let mut slot = self.connection.lock().await;
        if let Some(conn) = slot.as_ref() {
            return Some(conn.clone());
        }
        match self.client.get_multiplexed_async_connection().await {
            Ok(conn) => {
                *slot = Some(conn.clone());
                Some(conn)
            }
            Err(e) => {
                error!("Failed to connect to Redis: {}", e);
                None
            }
        }
    }

    /// 连接层错误时丢弃缓存的连接
    async fn on_error(&self, action: &str, key: &str, e: &RedisError) {
        error!("Redis {} '{}' failed: {}", action, key, e);
        if e.is_io_error() || e.is_connection_dropped() {
            *self.connection.lock().await = None;
        }
    }

    fn prefixed(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }

    fn ttl_or_default(&self, ttl: u64) -> u64 {
        if ttl == 0 { self.default_ttl } else { ttl }
    }
}

#[async_trait]
impl ObjectCache for RedisObjectCache {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        let Some(mut conn) = self.connection().await else {
            return CacheResult::ExistsButNoValue;
        };

        match conn.get::<_, Option<String>>(self.prefixed(key)).await {
            Ok(Some(value)) => CacheResult::Found(value),
            Ok(None) => CacheResult::NotFound,
            Err(e) => {
                self.on_error("GET", key, &e).await;
                CacheResult::ExistsButNoValue
            }
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        let Some(mut conn) = self.connection().await else {
            return;
        };

        let ttl = self.ttl_or_default(ttl);
        match conn
            .set_ex::<_, _, ()>(self.prefixed(&key), value, ttl)
            .await
        {
            Ok(()) => debug!("Cached {} for {}s", key, ttl),
            Err(e) => self.on_error("SETEX", &key, &e).await,
        }
    }

    async fn remove(&self, key: &str) {
        let Some(mut conn) = self.connection().await else {
            return;
        };

        match conn.del::<_, i64>(self.prefixed(key)).await {
            Ok(removed) => debug!("Evicted {} ({} key)", key, removed),
            Err(e) => self.on_error("DEL", key, &e).await,
        }
    }

    async fn invalidate_all(&self) {
        let Some(mut conn) = self.connection().await else {
            return;
        };

        let pattern = self.prefixed("*");
        let keys: Vec<String> = match conn.keys(&pattern).await {
            Ok(keys) => keys,
            Err(e) => {
                warn!("Failed to list keys for '{}': {}", pattern, e);
                return;
            }
        };
        if keys.is_empty() {
            return;
        }

        match conn.del::<_, i64>(keys).await {
            Ok(count) => debug!("Invalidated {} cached keys", count),
            Err(e) => self.on_error("DEL", &pattern, &e).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Client::open 只解析 URL，不会真正连接
    fn cache() -> RedisObjectCache {
        let client = redis::Client::open("redis://127.0.0.1:6379/").unwrap();
        RedisObjectCache::with_client(client, "artclub:", 300)
    }

    #[test]
    fn test_keys_are_prefixed() {
        let cache = cache();
        assert_eq!(cache.prefixed("profile:7"), "artclub:profile:7");
        assert_eq!(cache.prefixed("*"), "artclub:*");
    }

    #[test]
    fn test_zero_ttl_falls_back_to_default() {
        let cache = cache();
        assert_eq!(cache.ttl_or_default(0), 300);
        assert_eq!(cache.ttl_or_default(45), 45);
    }

    #[test]
    fn test_unreachable_server_fails_ping() {
        // 端口 1 上不会有 Redis
        let client = redis::Client::open("redis://127.0.0.1:1/").unwrap();
        assert!(ping(&client, "redis://127.0.0.1:1/").is_err());
    }
}
