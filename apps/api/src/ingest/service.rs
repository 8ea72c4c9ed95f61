//! Fetch orchestration: resolve providers, pull postings, dedup-upsert them
//! into the job store, and audit every provider invocation in fetch_logs.

use chrono::{Duration, Utc};
use serde::Serialize;
use sqlx::PgPool;
use std::time::Instant;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::ingest::dedup::dedup_hash;
use crate::models::job::JobRow;
use crate::models::search::SearchRow;
use crate::sources::registry::SourceRegistry;
use crate::sources::visa::infer_visa_from_posting;
use crate::sources::{JobPosting, JobSearchQuery};

/// A job upserted within this window of "now" counts as newly inserted for
/// the invocation summary; anything older was a refresh of an existing row.
const NEW_JOB_WINDOW_SECS: i64 = 5;

/// Outcome of one provider invocation. Mirrors the fetch_logs row.
#[derive(Debug, Clone, Serialize)]
pub struct FetchResult {
    pub search_id: Option<Uuid>,
    pub provider: String,
    pub success: bool,
    pub jobs_found: usize,
    pub jobs_new: usize,
    pub error: Option<String>,
    pub duration_ms: u64,
}

impl FetchResult {
    fn failure(
        search_id: Option<Uuid>,
        provider: &str,
        error: String,
        duration_ms: u64,
    ) -> Self {
        FetchResult {
            search_id,
            provider: provider.to_string(),
            success: false,
            jobs_found: 0,
            jobs_new: 0,
            error: Some(error),
            duration_ms,
        }
    }
}

/// Aggregate of a batch of fetch results, reported back to the admin
/// trigger and the worker.
#[derive(Debug, Clone, Serialize)]
pub struct FetchSummary {
    pub total_fetches: usize,
    pub successful: usize,
    pub failed: usize,
    pub total_jobs_found: usize,
    pub total_new_jobs: usize,
}

impl FetchSummary {
    pub fn from_results(results: &[FetchResult]) -> Self {
        FetchSummary {
            total_fetches: results.len(),
            successful: results.iter().filter(|r| r.success).count(),
            failed: results.iter().filter(|r| !r.success).count(),
            total_jobs_found: results.iter().map(|r| r.jobs_found).sum(),
            total_new_jobs: results.iter().map(|r| r.jobs_new).sum(),
        }
    }
}

/// Invokes one provider and stores what it returns. Every invocation writes
/// exactly one fetch_logs row, success or failure; the timer spans the
/// provider call plus storage, not the log write.
pub async fn fetch_from_provider(
    pool: &PgPool,
    registry: &SourceRegistry,
    provider_id: &str,
    query: &JobSearchQuery,
    search_id: Option<Uuid>,
) -> FetchResult {
    let Some(provider) = registry.get(provider_id) else {
        return FetchResult::failure(
            search_id,
            provider_id,
            format!("Provider not found: {provider_id}"),
            0,
        );
    };

    let started = Instant::now();
    let result = provider.fetch_jobs(query).await;

    if let Some(provider_error) = result.error {
        let duration_ms = started.elapsed().as_millis() as u64;
        warn!("Provider {provider_id} failed after {duration_ms}ms: {provider_error}");
        write_fetch_log(
            pool,
            search_id,
            provider_id,
            false,
            0,
            0,
            Some(provider_error.as_str()),
            duration_ms,
        )
        .await;
        return FetchResult::failure(search_id, provider_id, provider_error, duration_ms);
    }

    let jobs_found = result.jobs.len();
    let jobs_new = store_jobs(pool, &result.jobs, provider_id, search_id).await;
    let duration_ms = started.elapsed().as_millis() as u64;

    info!("Provider {provider_id}: {jobs_found} found, {jobs_new} new ({duration_ms}ms)");
    write_fetch_log(pool, search_id, provider_id, true, jobs_found, jobs_new, None, duration_ms)
        .await;

    FetchResult {
        search_id,
        provider: provider_id.to_string(),
        success: true,
        jobs_found,
        jobs_new,
        error: None,
        duration_ms,
    }
}

/// Upserts a batch of postings keyed by dedup hash. First sighting inserts
/// the full row; later sightings refresh only the volatile fields. A
/// per-posting storage failure is logged and skipped so the rest of the
/// batch still lands.
pub async fn store_jobs(
    pool: &PgPool,
    postings: &[JobPosting],
    source: &str,
    search_id: Option<Uuid>,
) -> usize {
    let mut new_count = 0;

    for posting in postings {
        let hash = dedup_hash(&posting.title, &posting.company, posting.location.as_deref());
        // An explicit provider answer wins over text inference.
        let visa = posting.visa_sponsorship.unwrap_or_else(|| {
            infer_visa_from_posting(
                &posting.title,
                posting.description.as_deref(),
                posting.snippet.as_deref(),
            )
        });

        let upserted: Result<JobRow, sqlx::Error> = sqlx::query_as(
            r#"
            INSERT INTO jobs
                (id, external_id, source, title, company, location, description, snippet,
                 remote, job_type, salary_min, salary_max, salary_currency, apply_url,
                 posted_at, visa_sponsorship, dedup_hash)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            ON CONFLICT (dedup_hash) DO UPDATE SET
                description = EXCLUDED.description,
                snippet = EXCLUDED.snippet,
                apply_url = EXCLUDED.apply_url,
                visa_sponsorship = EXCLUDED.visa_sponsorship,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&posting.external_id)
        .bind(source)
        .bind(&posting.title)
        .bind(&posting.company)
        .bind(&posting.location)
        .bind(&posting.description)
        .bind(&posting.snippet)
        .bind(posting.remote)
        .bind(&posting.job_type)
        .bind(posting.salary_min)
        .bind(posting.salary_max)
        .bind(&posting.salary_currency)
        .bind(&posting.apply_url)
        .bind(posting.posted_at)
        .bind(visa.as_str())
        .bind(&hash)
        .fetch_one(pool)
        .await;

        let job = match upserted {
            Ok(job) => job,
            Err(e) => {
                error!(
                    "Error storing job '{}' at '{}': {e}",
                    posting.title, posting.company
                );
                continue;
            }
        };

        if let Some(search_id) = search_id {
            let associated = sqlx::query(
                "INSERT INTO search_jobs (search_id, job_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(search_id)
            .bind(job.id)
            .execute(pool)
            .await;
            if let Err(e) = associated {
                error!("Error associating job {} with search {search_id}: {e}", job.id);
            }
        }

        if job.created_at >= Utc::now() - Duration::seconds(NEW_JOB_WINDOW_SECS) {
            new_count += 1;
        }
    }

    new_count
}

/// Runs every provider enabled on a search, sequentially. Providers are
/// rate-limited external services; fanning out concurrently buys little and
/// costs politeness.
pub async fn fetch_jobs_for_search(
    pool: &PgPool,
    registry: &SourceRegistry,
    search_id: Uuid,
) -> Result<Vec<FetchResult>, AppError> {
    let search: Option<SearchRow> = sqlx::query_as("SELECT * FROM searches WHERE id = $1")
        .bind(search_id)
        .fetch_optional(pool)
        .await?;
    let search = search.ok_or_else(|| AppError::NotFound(format!("Search {search_id} not found")))?;

    let providers = registry.get_by_ids(&search.provider_ids());
    let query = JobSearchQuery {
        keywords: search.keywords,
        location: search.location,
        remote: search.remote,
    };

    let mut results = Vec::with_capacity(providers.len());
    for provider in providers {
        results.push(fetch_from_provider(pool, registry, provider.id(), &query, Some(search_id)).await);
    }
    Ok(results)
}

/// Runs every active search. One search failing (e.g. deleted concurrently)
/// does not stop the rest.
pub async fn fetch_all_active_searches(
    pool: &PgPool,
    registry: &SourceRegistry,
) -> Result<Vec<FetchResult>, AppError> {
    let searches: Vec<SearchRow> = sqlx::query_as("SELECT * FROM searches WHERE is_active = TRUE")
        .fetch_all(pool)
        .await?;

    let mut all_results = Vec::new();
    for search in searches {
        match fetch_jobs_for_search(pool, registry, search.id).await {
            Ok(results) => all_results.extend(results),
            Err(e) => warn!("Fetch failed for search {} ({}): {e}", search.id, search.name),
        }
    }
    Ok(all_results)
}

#[allow(clippy::too_many_arguments)]
async fn write_fetch_log(
    pool: &PgPool,
    search_id: Option<Uuid>,
    provider: &str,
    success: bool,
    jobs_found: usize,
    jobs_new: usize,
    error_message: Option<&str>,
    duration_ms: u64,
) {
    let written = sqlx::query(
        r#"
        INSERT INTO fetch_logs (id, search_id, provider, success, jobs_found, jobs_new, error, duration_ms)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(search_id)
    .bind(provider)
    .bind(success)
    .bind(jobs_found as i32)
    .bind(jobs_new as i32)
    .bind(error_message)
    .bind(duration_ms as i64)
    .execute(pool)
    .await;

    if let Err(e) = written {
        error!("Failed to write fetch log for provider {provider}: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(success: bool, found: usize, new: usize) -> FetchResult {
        FetchResult {
            search_id: None,
            provider: "mock".to_string(),
            success,
            jobs_found: found,
            jobs_new: new,
            error: (!success).then(|| "API error: 503".to_string()),
            duration_ms: 12,
        }
    }

    #[test]
    fn test_summary_counts_successes_and_failures() {
        let results = vec![result(true, 10, 3), result(false, 0, 0), result(true, 5, 5)];
        let summary = FetchSummary::from_results(&results);
        assert_eq!(summary.total_fetches, 3);
        assert_eq!(summary.successful, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.total_jobs_found, 15);
        assert_eq!(summary.total_new_jobs, 8);
    }

    #[test]
    fn test_provider_error_increments_failed_by_one() {
        let before = FetchSummary::from_results(&[result(true, 4, 1)]);
        let after = FetchSummary::from_results(&[result(true, 4, 1), result(false, 0, 0)]);
        assert_eq!(after.failed, before.failed + 1);
        assert_eq!(after.total_jobs_found, before.total_jobs_found);
    }

    #[test]
    fn test_summary_of_empty_batch() {
        let summary = FetchSummary::from_results(&[]);
        assert_eq!(summary.total_fetches, 0);
        assert_eq!(summary.successful, 0);
        assert_eq!(summary.failed, 0);
    }

    #[tokio::test]
    async fn test_unknown_provider_yields_failure_result() {
        // No pool is touched for an unknown provider, so a lazy pool that
        // never connects is safe here.
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        let registry = SourceRegistry::new();
        let result = fetch_from_provider(
            &pool,
            &registry,
            "no-such-provider",
            &JobSearchQuery::default(),
            None,
        )
        .await;
        assert!(!result.success);
        assert_eq!(result.jobs_found, 0);
        assert!(result.error.unwrap().contains("Provider not found"));
    }
}
