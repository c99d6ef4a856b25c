use chrono::{DateTime, NaiveDate, Utc};

/// 解析日期输入：接受 `YYYY-MM-DD`（按 UTC 零点）或 RFC3339
pub fn parse_flexible_date(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// 时间戳（秒）转 UTC 时间，越界时回落到 UNIX 纪元
pub fn from_timestamp(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_date() {
        let dt = parse_flexible_date("2025-06-01").unwrap();
        assert_eq!(dt.to_rfc3339(), "2025-06-01T00:00:00+00:00");
    }

    #[test]
    fn test_rfc3339_with_offset() {
        let dt = parse_flexible_date("2025-06-01T08:00:00+08:00").unwrap();
        assert_eq!(dt.timestamp(), parse_flexible_date("2025-06-01").unwrap().timestamp());
    }

    #[test]
    fn test_invalid() {
        assert!(parse_flexible_date("06/01/2025").is_none());
        assert!(parse_flexible_date("").is_none());
    }
}
