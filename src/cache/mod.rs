//! 缓存层
//!
//! 后端以插件形式在加载时注册（`declare_object_cache_plugin!`），启动时按配置名选择。

pub mod object_cache;
pub mod register;
pub mod traits;

pub use traits::{CacheResult, ObjectCache, get_json, insert_json};

/// 声明并注册缓存插件
///
/// 类型需提供 `fn new() -> Result<Self, String>`。
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:literal, $ty:ty) => {
        #[ctor::ctor]
        unsafe fn __register_object_cache_plugin() {
            $crate::cache::register::register_object_cache_plugin(
                $name,
                std::sync::Arc::new(|| {
                    Box::pin(async {
                        let cache = <$ty>::new().map_err(|e| {
                            $crate::errors::ArtClubError::cache_connection(format!(
                                "{} cache init failed: {e}",
                                $name
                            ))
                        })?;
                        Ok(Box::new(cache) as Box<dyn $crate::cache::ObjectCache>)
                    })
                }),
            );
        }
    };
}
