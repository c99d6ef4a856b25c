use chrono::{DateTime, NaiveDate, Utc};

/// 计算连续提交天数
///
/// 按 UTC 日期去重后从最近一天往前数，遇到第一个空档即停止。
/// 起点是最近一次提交的日期，不要求是今天。
pub fn submission_streak(timestamps: &[DateTime<Utc>]) -> u32 {
    let mut days: Vec<NaiveDate> = timestamps.iter().map(|t| t.date_naive()).collect();
    days.sort_unstable_by(|a, b| b.cmp(a));
    days.dedup();

    let Some(first) = days.first() else {
        return 0;
    };

    let mut streak = 1;
    let mut previous = *first;
    for day in days.iter().skip(1) {
        if previous.signed_duration_since(*day).num_days() == 1 {
            streak += 1;
            previous = *day;
        } else {
            break;
        }
    }
    streak
}
