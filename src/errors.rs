//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_artclub_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum ArtClubError {
            $($variant(String),)*
        }

        impl ArtClubError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(ArtClubError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(ArtClubError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(ArtClubError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl ArtClubError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        ArtClubError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_artclub_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    ObjectStore("E010", "Object Storage Error"),
    DateParse("E011", "Date Parse Error"),
    Authentication("E012", "Authentication Error"),
    Authorization("E013", "Authorization Error"),
    Conflict("E014", "Resource Conflict"),
}

impl ArtClubError {
    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for ArtClubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ArtClubError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for ArtClubError {
    fn from(err: sea_orm::DbErr) -> Self {
        ArtClubError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for ArtClubError {
    fn from(err: std::io::Error) -> Self {
        ArtClubError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for ArtClubError {
    fn from(err: serde_json::Error) -> Self {
        ArtClubError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for ArtClubError {
    fn from(err: chrono::ParseError) -> Self {
        ArtClubError::DateParse(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for ArtClubError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        ArtClubError::Authentication(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ArtClubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ArtClubError::cache_connection("test").code(), "E001");
        assert_eq!(ArtClubError::database_config("test").code(), "E003");
        assert_eq!(ArtClubError::validation("test").code(), "E007");
        assert_eq!(ArtClubError::authentication("test").code(), "E012");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            ArtClubError::cache_connection("test").error_type(),
            "Cache Connection Error"
        );
        assert_eq!(
            ArtClubError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = ArtClubError::validation("Invalid input");
        assert_eq!(err.message(), "Invalid input");
    }

    #[test]
    fn test_object_store_error() {
        let err = ArtClubError::object_store("bucket missing");
        assert_eq!(err.code(), "E010");
        assert_eq!(err.error_type(), "Object Storage Error");
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: ArtClubError = io.into();
        assert_eq!(err.code(), "E006");
        assert!(err.message().contains("gone"));
    }

    #[test]
    fn test_format_simple() {
        let err = ArtClubError::validation("Invalid URL");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("Invalid URL"));
    }
}
