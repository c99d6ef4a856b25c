use crate::cache::{ObjectCache, register::get_object_cache_plugin};
use crate::config::AppConfig;
use crate::errors::{ArtClubError, Result};
use crate::models::profiles::entities::UserRole;
use crate::models::profiles::requests::CreateProfile;
use crate::object_store::ObjectStore;
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::random_code::generate_code;
use std::sync::Arc;
use tracing::{debug, info, warn};

const DEFAULT_ADMIN_EMAIL: &str = "admin@artclub.local";

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
    pub objects: Arc<dyn ObjectStore>,
}

async fn build_cache(name: &str) -> Option<Arc<dyn ObjectCache>> {
    let constructor = get_object_cache_plugin(name)?;
    match constructor().await {
        Ok(cache) => {
            warn!("Successfully created {} cache backend", name);
            Some(Arc::from(cache))
        }
        Err(e) => {
            warn!("Failed to create {} cache: {}", name, e);
            None
        }
    }
}

/// 创建缓存实例，配置的后端不可用时回退到 moka
async fn create_cache() -> Result<Arc<dyn ObjectCache>> {
    let cache_type = AppConfig::get().cache.cache_type.as_str();
    warn!("Attempting to create {} cache backend", cache_type);

    if get_object_cache_plugin(cache_type).is_none() {
        warn!("Cache backend '{}' not found in registry", cache_type);
    } else if let Some(cache) = build_cache(cache_type).await {
        return Ok(cache);
    }

    if cache_type != "moka" {
        warn!("Falling back to memory cache");
        if let Some(cache) = build_cache("moka").await {
            return Ok(cache);
        }
    }

    Err(ArtClubError::cache_plugin_not_found(format!(
        "No cache backend available (tried: {cache_type})"
    )))
}

/// 数据库里没有任何用户时创建默认管理员
///
/// 邮箱取 `ADMIN_EMAIL`，密码取 `ADMIN_PASSWORD`，未设置密码时随机生成并打印。
async fn seed_admin(storage: &Arc<dyn Storage>) {
    match storage.count_profiles().await {
        Ok(count) if count > 0 => {
            debug!(
                "Database already has {} profile(s), skipping admin seed",
                count
            );
            return;
        }
        Ok(_) => {
            info!("No profiles found in database, creating default admin account...");
        }
        Err(e) => {
            warn!("Failed to count profiles: {}, skipping admin seed", e);
            return;
        }
    }

    let email = std::env::var("ADMIN_EMAIL")
        .map(|e| e.trim().to_lowercase())
        .ok()
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| DEFAULT_ADMIN_EMAIL.to_string());

    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
        let pwd = generate_code(16);
        warn!("==========================================================");
        warn!("  ADMIN PASSWORD NOT SET - USING GENERATED PASSWORD");
        warn!("  Generated admin password: {}", pwd);
        warn!("  Please save this password or set ADMIN_PASSWORD env var");
        warn!("==========================================================");
        pwd
    });

    let password_hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            warn!("Failed to hash admin password: {}, skipping admin seed", e);
            return;
        }
    };

    match storage
        .create_profile(CreateProfile {
            email,
            password_hash,
            full_name: Some("Administrator".to_string()),
            role: UserRole::Admin,
        })
        .await
    {
        Ok(profile) => {
            info!(
                "Default admin account created successfully (ID: {}, email: {})",
                profile.id, profile.email
            );
        }
        Err(e) => {
            warn!("Failed to create admin account: {}", e);
        }
    }
}

/// 准备服务器启动的上下文：存储（含迁移）、默认管理员、对象存储、缓存
pub async fn prepare_server_startup() -> Result<StartupContext> {
    // redis 与数据库的 TLS 连接共用 ring 作为加密后端；重复安装时忽略
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }

    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
    }

    let config = AppConfig::get();
    if config.jwt.secret_is_ephemeral {
        warn!("JWT_SECRET is not set, using an ephemeral secret: tokens and signed URLs expire on restart");
    }

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    seed_admin(&storage).await;

    let objects = crate::object_store::create_object_store().await?;
    warn!("Object store initialized at {}", config.upload.dir);

    let cache = create_cache().await?;
    warn!("Cache backend initialized");

    Ok(StartupContext {
        storage,
        cache,
        objects,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::SeaOrmStorage;

    #[tokio::test]
    async fn test_seed_admin_only_on_empty_database() {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::new_in_memory().await.unwrap());

        seed_admin(&storage).await;
        assert_eq!(storage.count_profiles().await.unwrap(), 1);

        seed_admin(&storage).await;
        assert_eq!(storage.count_profiles().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_create_cache_uses_configured_backend() {
        // 默认配置为 moka
        assert!(create_cache().await.is_ok());
    }
}
