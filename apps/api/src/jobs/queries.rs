//! Read-side queries over stored jobs. Listings and recommendations only
//! consider jobs posted within the last seven days.

use chrono::{DateTime, Days, Utc};
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::job::{JobForMatchingRow, JobRow};
use uuid::Uuid;

/// UTC midnight seven days before now. Anchoring to midnight keeps the
/// window stable across a day instead of sliding with every request.
pub fn seven_days_ago() -> DateTime<Utc> {
    let today = Utc::now().date_naive();
    let threshold = today.checked_sub_days(Days::new(7)).unwrap_or(today);
    threshold
        .and_hms_opt(0, 0, 0)
        .expect("midnight is a valid time")
        .and_utc()
}

/// Jobs from the 7-day window, newest first, optionally restricted to the
/// postings a given search has surfaced. Returns the page plus the total.
pub async fn get_recent_jobs(
    pool: &PgPool,
    search_id: Option<Uuid>,
    limit: i64,
    offset: i64,
) -> Result<(Vec<JobRow>, i64), AppError> {
    let threshold = seven_days_ago();

    let (jobs, total) = match search_id {
        Some(search_id) => {
            let jobs: Vec<JobRow> = sqlx::query_as(
                r#"
                SELECT j.* FROM jobs j
                JOIN search_jobs sj ON sj.job_id = j.id
                WHERE j.posted_at >= $1 AND sj.search_id = $2
                ORDER BY j.posted_at DESC
                LIMIT $3 OFFSET $4
                "#,
            )
            .bind(threshold)
            .bind(search_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;
            let total: i64 = sqlx::query_scalar(
                r#"
                SELECT COUNT(*) FROM jobs j
                JOIN search_jobs sj ON sj.job_id = j.id
                WHERE j.posted_at >= $1 AND sj.search_id = $2
                "#,
            )
            .bind(threshold)
            .bind(search_id)
            .fetch_one(pool)
            .await?;
            (jobs, total)
        }
        None => {
            let jobs: Vec<JobRow> = sqlx::query_as(
                "SELECT * FROM jobs WHERE posted_at >= $1 ORDER BY posted_at DESC LIMIT $2 OFFSET $3",
            )
            .bind(threshold)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await?;
            let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM jobs WHERE posted_at >= $1")
                .bind(threshold)
                .fetch_one(pool)
                .await?;
            (jobs, total)
        }
    };

    Ok((jobs, total))
}

/// Slim rows for the scorer, same 7-day window and optional search scope.
pub async fn get_jobs_for_matching(
    pool: &PgPool,
    search_id: Option<Uuid>,
) -> Result<Vec<JobForMatchingRow>, AppError> {
    let threshold = seven_days_ago();

    let jobs = match search_id {
        Some(search_id) => {
            sqlx::query_as(
                r#"
                SELECT j.id, j.title, j.company, j.location, j.description, j.snippet, j.remote
                FROM jobs j
                JOIN search_jobs sj ON sj.job_id = j.id
                WHERE j.posted_at >= $1 AND sj.search_id = $2
                "#,
            )
            .bind(threshold)
            .bind(search_id)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as(
                "SELECT id, title, company, location, description, snippet, remote FROM jobs WHERE posted_at >= $1",
            )
            .bind(threshold)
            .fetch_all(pool)
            .await?
        }
    };

    Ok(jobs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_threshold_is_midnight_utc() {
        let threshold = seven_days_ago();
        assert_eq!(threshold.hour(), 0);
        assert_eq!(threshold.minute(), 0);
        assert_eq!(threshold.second(), 0);
    }

    #[test]
    fn test_threshold_is_seven_days_back() {
        let threshold = seven_days_ago();
        let days = (Utc::now().date_naive() - threshold.date_naive()).num_days();
        assert_eq!(days, 7);
    }

    #[test]
    fn test_window_includes_recent_and_excludes_old() {
        let threshold = seven_days_ago();
        let yesterday = Utc::now() - chrono::Duration::days(1);
        let eight_days_ago = Utc::now() - chrono::Duration::days(8);
        assert!(yesterday >= threshold);
        assert!(eight_days_ago < threshold);
    }
}
