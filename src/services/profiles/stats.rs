//! 学员学习统计

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{DateTime, Duration, Utc};
use std::collections::{HashMap, HashSet};

use super::ProfileService;
use crate::middlewares::RequireJWT;
use crate::models::ApiResponse;
use crate::models::competitions::entities::Competition;
use crate::models::profiles::entities::UserRole;
use crate::models::stats::responses::{
    Achievements, ActivityEntry, CategoryProgress, RecentActivity, StatsOverview,
    StudentStatsResponse, UpcomingDeadline,
};
use crate::models::submissions::entities::SubmissionDetail;
use crate::models::tutorials::entities::TutorialCategory;
use crate::services::{forbidden, internal_error, unauthorized};
use crate::utils::streak::submission_streak;

const RECENT_DAYS: i64 = 30;
const DEADLINE_LIMIT: u64 = 5;
const PERFECT_SCORE: i32 = 100;

/// 由原始数据计算统计结果，不访问数据库
pub fn build_student_stats(
    now: DateTime<Utc>,
    tutorial_counts: &HashMap<TutorialCategory, i64>,
    submissions: &[SubmissionDetail],
    deadlines: Vec<Competition>,
) -> StudentStatsResponse {
    let total_lessons: i64 = tutorial_counts.values().sum();
    let completed: HashSet<i64> = submissions.iter().map(|d| d.submission.lesson_id).collect();
    let completed_lessons = completed.len() as i64;
    let progress_percentage = if total_lessons == 0 {
        0
    } else {
        ((completed_lessons as f64 * 100.0 / total_lessons as f64).round() as i64).min(100)
    };

    let scores: Vec<i32> = submissions
        .iter()
        .filter_map(|d| d.review.as_ref().map(|r| r.score))
        .collect();
    let average_score = if scores.is_empty() {
        0
    } else {
        (scores.iter().map(|s| *s as f64).sum::<f64>() / scores.len() as f64).round() as i64
    };

    let total_submissions = submissions.len() as i64;
    let reviewed_submissions = scores.len() as i64;

    // 只列出有提交的分类
    let categories = TutorialCategory::ALL
        .iter()
        .filter_map(|category| {
            let lessons: HashSet<i64> = submissions
                .iter()
                .filter(|d| d.lesson.as_ref().is_some_and(|l| l.category == *category))
                .map(|d| d.submission.lesson_id)
                .collect();
            (!lessons.is_empty()).then(|| CategoryProgress {
                category: *category,
                completed: lessons.len() as i64,
                total: tutorial_counts.get(category).copied().unwrap_or(0),
            })
        })
        .collect();

    let since = now - Duration::days(RECENT_DAYS);
    let recent: Vec<ActivityEntry> = submissions
        .iter()
        .filter(|d| d.submission.created_at >= since)
        .map(|d| ActivityEntry {
            id: d.submission.id,
            lesson_id: d.submission.lesson_id,
            lesson: d
                .lesson
                .as_ref()
                .map(|l| l.title.clone())
                .unwrap_or_default(),
            created_at: d.submission.created_at,
        })
        .collect();

    let upcoming_deadlines = deadlines
        .into_iter()
        .map(|c| UpcomingDeadline {
            id: c.id,
            title: c.title,
            due_date: c.end_at,
            kind: "competition".to_string(),
            awards: c.awards,
        })
        .collect();

    let dates: Vec<DateTime<Utc>> = submissions.iter().map(|d| d.submission.created_at).collect();

    StudentStatsResponse {
        overview: StatsOverview {
            total_lessons,
            completed_lessons,
            progress_percentage,
            average_score,
            total_submissions,
            reviewed_submissions,
            pending_reviews: total_submissions - reviewed_submissions,
        },
        categories,
        recent_activity: RecentActivity {
            count: recent.len() as i64,
            submissions: recent,
        },
        upcoming_deadlines,
        achievements: Achievements {
            first_submission: dates.iter().min().copied(),
            perfect_scores: scores.iter().filter(|s| **s == PERFECT_SCORE).count() as i64,
            streak_days: submission_streak(&dates) as i64,
        },
    }
}

pub async fn handle_student_stats(
    service: &ProfileService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(profile) = RequireJWT::extract_profile(request) else {
        return Ok(unauthorized());
    };
    if profile.role != UserRole::Student {
        return Ok(forbidden("Statistics are only available to students"));
    }

    let storage = service.get_storage(request);
    let now = Utc::now();

    let tutorial_counts = match storage.count_tutorials_by_category().await {
        Ok(counts) => counts,
        Err(e) => return Ok(internal_error("统计教程数量失败", e)),
    };
    let submissions = match storage.list_submission_details(Some(profile.id)).await {
        Ok(list) => list,
        Err(e) => return Ok(internal_error("查询提交记录失败", e)),
    };
    let deadlines = match storage.list_upcoming_deadlines(now, DEADLINE_LIMIT).await {
        Ok(list) => list,
        Err(e) => return Ok(internal_error("查询比赛截止时间失败", e)),
    };

    let stats = build_student_stats(now, &tutorial_counts, &submissions, deadlines);
    Ok(HttpResponse::Ok().json(ApiResponse::success(stats, "获取成功")))
}
