use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

/// 姓名允许为空，填写时长度 1..=64（按字符计）
pub fn validate_full_name(full_name: &str) -> Result<(), &'static str> {
    let len = full_name.trim().chars().count();
    if len == 0 || len > 64 {
        return Err("Full name must be between 1 and 64 characters");
    }
    Ok(())
}

/// 标题类字段：去掉首尾空白后 1..=200 字符
pub fn validate_title(title: &str) -> Result<(), &'static str> {
    let len = title.trim().chars().count();
    if len == 0 {
        return Err("Title is required");
    }
    if len > 200 {
        return Err("Title must be at most 200 characters");
    }
    Ok(())
}

/// 评分范围 0..=100
pub fn validate_score(score: i32) -> Result<(), &'static str> {
    if !(0..=100).contains(&score) {
        return Err("Score must be between 0 and 100");
    }
    Ok(())
}

/// 密码策略验证结果
#[derive(Debug, Clone)]
pub struct PasswordValidationResult {
    pub is_valid: bool,
    pub errors: Vec<&'static str>,
}

impl PasswordValidationResult {
    pub fn error_message(&self) -> String {
        self.errors.join("; ")
    }
}

/// 验证密码是否符合安全策略
///
/// 策略要求：
/// - 最小长度：8 字符
/// - 必须包含字母和数字
/// - 不能是常见弱密码
pub fn validate_password(password: &str) -> PasswordValidationResult {
    let mut errors = Vec::new();

    if password.chars().count() < 8 {
        errors.push("Password must be at least 8 characters long");
    }

    if !password.chars().any(|c| c.is_alphabetic()) {
        errors.push("Password must contain at least one letter");
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one digit");
    }

    let weak_passwords = [
        "password1",
        "12345678a",
        "qwerty123",
        "admin123",
        "abcd1234",
        "artclub1",
    ];
    if weak_passwords
        .iter()
        .any(|&weak| password.eq_ignore_ascii_case(weak))
    {
        errors.push("Password is too common, please choose a stronger password");
    }

    PasswordValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

/// 简化的密码验证（返回 Result）
pub fn validate_password_simple(password: &str) -> Result<(), String> {
    let result = validate_password(password);
    if result.is_valid {
        Ok(())
    } else {
        Err(result.error_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        assert!(validate_email("mia@artclub.org").is_ok());
        assert!(validate_email("mia.artclub.org").is_err());
        assert!(validate_email("mia@artclub").is_err());
    }

    #[test]
    fn test_full_name() {
        assert!(validate_full_name("Mia Wong").is_ok());
        assert!(validate_full_name("   ").is_err());
        assert!(validate_full_name(&"x".repeat(65)).is_err());
    }

    #[test]
    fn test_score_bounds() {
        assert!(validate_score(0).is_ok());
        assert!(validate_score(100).is_ok());
        assert!(validate_score(-1).is_err());
        assert!(validate_score(101).is_err());
    }

    #[test]
    fn test_valid_password() {
        assert!(validate_password("sketchbook42").is_valid);
        assert!(validate_password("Watercolor2024").is_valid);
    }

    #[test]
    fn test_weak_passwords() {
        let result = validate_password("abc1");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must be at least 8 characters long")
        );

        let result = validate_password("onlyletters");
        assert!(
            result
                .errors
                .contains(&"Password must contain at least one digit")
        );

        let result = validate_password("ArtClub1");
        assert!(
            result
                .errors
                .contains(&"Password is too common, please choose a stronger password")
        );
    }
}
