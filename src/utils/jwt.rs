use crate::config::AppConfig;
use actix_web::cookie::{Cookie, SameSite};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

// JWT Claims 结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,        // Subject (profile ID)
    pub role: String,       // 用户角色
    pub token_type: String, // token类型: "access" 或 "refresh"
    pub exp: usize,         // Expiration time (时间戳)
    pub iat: usize,         // Issued at (签发时间)
}

// 对象签名链接 Claims：只对一个 bucket 下的一个路径有效
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectClaims {
    pub bucket: String,
    pub path: String,
    pub exp: usize,
    pub iat: usize,
}

// Token 响应结构体
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

pub struct JwtUtils;

impl JwtUtils {
    // 获取 JWT 密钥
    fn get_secret() -> String {
        AppConfig::get().jwt.secret.clone()
    }

    // 生成 Access Token
    pub fn generate_access_token(
        profile_id: i64,
        role: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let config = AppConfig::get();
        Self::generate_token_with_expiry(
            profile_id,
            role,
            "access",
            chrono::Duration::minutes(config.jwt.access_token_expiry),
        )
    }

    // 生成 Refresh Token
    pub fn generate_refresh_token(
        profile_id: i64,
        role: &str,
        token_expiry: Option<chrono::Duration>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let config = AppConfig::get();
        let expiry = token_expiry
            .unwrap_or_else(|| chrono::Duration::days(config.jwt.refresh_token_expiry));
        Self::generate_token_with_expiry(profile_id, role, "refresh", expiry)
    }

    // 生成带自定义过期时间的 Token
    pub fn generate_token_with_expiry(
        profile_id: i64,
        role: &str,
        token_type: &str,
        expiry_duration: chrono::Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        encode_claims(
            &Self::get_secret(),
            &build_claims(profile_id, role, token_type, expiry_duration),
        )
    }

    // 生成完整的 Token 对（access + refresh）
    pub fn generate_token_pair(
        profile_id: i64,
        role: &str,
        refresh_token_expiry: Option<chrono::Duration>,
    ) -> Result<TokenPair, jsonwebtoken::errors::Error> {
        let access_token = Self::generate_access_token(profile_id, role)?;
        let refresh_token = Self::generate_refresh_token(profile_id, role, refresh_token_expiry)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    // 验证 token 是否为指定类型
    pub fn verify_token_type(
        token: &str,
        expected_type: &str,
    ) -> Result<Claims, jsonwebtoken::errors::Error> {
        verify_typed_claims(&Self::get_secret(), token, expected_type)
    }

    // 验证 Access Token
    pub fn verify_access_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::verify_token_type(token, "access")
    }

    // 验证 Refresh Token
    pub fn verify_refresh_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::verify_token_type(token, "refresh")
    }

    // 使用 Refresh Token 生成新的 Access Token
    pub fn refresh_access_token(
        refresh_token: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Self::verify_refresh_token(refresh_token)?;
        let profile_id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| jsonwebtoken::errors::ErrorKind::InvalidToken)?;
        Self::generate_access_token(profile_id, &claims.role)
    }

    /// 创建 Refresh Token Cookie
    pub fn create_refresh_token_cookie(
        refresh_token: &str,
        max_age_days: i64,
    ) -> Cookie<'static> {
        let config = AppConfig::get();
        Cookie::build(REFRESH_TOKEN_COOKIE, refresh_token.to_string())
            .path("/")
            .max_age(actix_web::cookie::time::Duration::days(max_age_days))
            // 魔法链接回调是跨站跳转进来的，Strict 会让 cookie 丢失
            .same_site(SameSite::Lax)
            .http_only(true)
            .secure(config.is_production()) // 生产环境下使用 HTTPS
            .finish()
    }

    /// 创建空的 Refresh Token Cookie（用于注销）
    pub fn create_empty_refresh_token_cookie() -> Cookie<'static> {
        let config = AppConfig::get();
        Cookie::build(REFRESH_TOKEN_COOKIE, "")
            .path("/")
            .max_age(actix_web::cookie::time::Duration::seconds(0))
            .same_site(SameSite::Lax)
            .http_only(true)
            .secure(config.is_production())
            .finish()
    }

    /// 从请求中提取 Refresh Token
    pub fn extract_refresh_token_from_cookie(req: &actix_web::HttpRequest) -> Option<String> {
        req.cookie(REFRESH_TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_string())
    }
}

fn build_claims(
    profile_id: i64,
    role: &str,
    token_type: &str,
    expiry_duration: chrono::Duration,
) -> Claims {
    let now = chrono::Utc::now();
    let expiration = now + expiry_duration;

    Claims {
        sub: profile_id.to_string(),
        role: role.to_string(),
        token_type: token_type.to_string(),
        exp: expiration.timestamp() as usize,
        iat: now.timestamp() as usize,
    }
}

fn encode_claims<T: Serialize>(secret: &str, claims: &T) -> Result<String, jsonwebtoken::errors::Error> {
    let encoding_key = EncodingKey::from_secret(secret.as_ref());
    encode(&Header::default(), claims, &encoding_key)
}

fn verify_typed_claims(
    secret: &str,
    token: &str,
    expected_type: &str,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let decoding_key = DecodingKey::from_secret(secret.as_ref());
    let claims = decode::<Claims>(token, &decoding_key, &Validation::default())?.claims;
    if claims.token_type != expected_type {
        return Err(jsonwebtoken::errors::Error::from(
            jsonwebtoken::errors::ErrorKind::InvalidToken,
        ));
    }
    Ok(claims)
}

/// 为对象生成签名 token，只对一个 bucket 下的一个路径有效
pub fn sign_object_token(
    secret: &str,
    bucket: &str,
    path: &str,
    expires_in: chrono::Duration,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = ObjectClaims {
        bucket: bucket.to_string(),
        path: path.to_string(),
        exp: (now + expires_in).timestamp() as usize,
        iat: now.timestamp() as usize,
    };
    encode_claims(secret, &claims)
}

/// 校验对象签名 token，bucket 与路径必须与签名时一致
pub fn verify_object_token(
    secret: &str,
    token: &str,
    bucket: &str,
    path: &str,
) -> Result<ObjectClaims, jsonwebtoken::errors::Error> {
    let decoding_key = DecodingKey::from_secret(secret.as_ref());
    let claims = decode::<ObjectClaims>(token, &decoding_key, &Validation::default())?.claims;
    if claims.bucket != bucket || claims.path != path {
        return Err(jsonwebtoken::errors::Error::from(
            jsonwebtoken::errors::ErrorKind::InvalidToken,
        ));
    }
    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn test_token_type_is_enforced() {
        let claims = build_claims(7, "student", "refresh", chrono::Duration::minutes(5));
        let token = encode_claims(SECRET, &claims).unwrap();

        assert!(verify_typed_claims(SECRET, &token, "refresh").is_ok());
        assert!(verify_typed_claims(SECRET, &token, "access").is_err());
        assert!(verify_typed_claims("other-secret", &token, "refresh").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        // Validation 默认有 60 秒宽限
        let claims = build_claims(7, "student", "access", chrono::Duration::minutes(-10));
        let token = encode_claims(SECRET, &claims).unwrap();
        assert!(verify_typed_claims(SECRET, &token, "access").is_err());
    }

    #[test]
    fn test_object_token_bound_to_path() {
        let token = sign_object_token(
            SECRET,
            "homework",
            "3/1700000000.pdf",
            chrono::Duration::seconds(600),
        )
        .unwrap();

        let claims =
            verify_object_token(SECRET, &token, "homework", "3/1700000000.pdf").unwrap();
        assert_eq!(claims.bucket, "homework");
        assert!(verify_object_token(SECRET, &token, "homework", "4/1700000000.pdf").is_err());
        assert!(verify_object_token(SECRET, &token, "avatars", "3/1700000000.pdf").is_err());
    }
}
