//! Job source providers — one implementation per external job board, all
//! normalizing to the common [`JobPosting`] shape behind the [`JobSource`]
//! trait.

pub mod providers;
pub mod registry;
pub mod visa;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sources::visa::infer_visa_from_posting;

/// Visa sponsorship classification for a posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisaSponsorship {
    Yes,
    No,
    Unknown,
}

impl VisaSponsorship {
    pub fn as_str(&self) -> &'static str {
        match self {
            VisaSponsorship::Yes => "yes",
            VisaSponsorship::No => "no",
            VisaSponsorship::Unknown => "unknown",
        }
    }
}

/// Provider-normalized shape of one job listing, before storage.
/// Produced by a provider, consumed once by the ingestion service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPosting {
    pub external_id: String,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub snippet: Option<String>,
    pub remote: bool,
    pub job_type: Option<String>,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub salary_currency: Option<String>,
    pub apply_url: String,
    pub posted_at: DateTime<Utc>,
    pub visa_sponsorship: Option<VisaSponsorship>,
}

/// Query parameters a search hands to each provider.
#[derive(Debug, Clone, Default)]
pub struct JobSearchQuery {
    pub keywords: String,
    pub location: Option<String>,
    pub remote: bool,
}

/// Result of one provider fetch. A populated `error` is the sole failure
/// signal — providers never panic or propagate past this boundary.
#[derive(Debug, Clone, Default)]
pub struct JobSourceResult {
    pub jobs: Vec<JobPosting>,
    pub total_found: Option<usize>,
    pub has_more: Option<bool>,
    pub error: Option<String>,
}

impl JobSourceResult {
    pub fn from_error(message: impl Into<String>) -> Self {
        JobSourceResult {
            error: Some(message.into()),
            ..Default::default()
        }
    }
}

/// The provider contract. Implementations are held behind
/// `Arc<dyn JobSource>` in the registry so new sources can be added without
/// touching dispatch logic.
#[async_trait]
pub trait JobSource: Send + Sync {
    fn id(&self) -> &'static str;
    fn name(&self) -> &'static str;

    /// Cheap, synchronous readiness check (feature flag, missing
    /// credential). Must not perform network I/O.
    fn is_available(&self) -> bool;

    /// Fetches and normalizes postings. Transport and non-2xx failures are
    /// folded into `JobSourceResult.error`.
    async fn fetch_jobs(&self, query: &JobSearchQuery) -> JobSourceResult;
}

/// Shared post-processing: postings a provider left without a structured
/// visa answer get the text heuristic applied.
pub fn backfill_visa(jobs: Vec<JobPosting>) -> Vec<JobPosting> {
    jobs.into_iter()
        .map(|mut job| {
            if job.visa_sponsorship.is_none()
                || job.visa_sponsorship == Some(VisaSponsorship::Unknown)
            {
                job.visa_sponsorship = Some(infer_visa_from_posting(
                    &job.title,
                    job.description.as_deref(),
                    job.snippet.as_deref(),
                ));
            }
            job
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posting(description: &str, visa: Option<VisaSponsorship>) -> JobPosting {
        JobPosting {
            external_id: "x-1".to_string(),
            title: "Software Engineer".to_string(),
            company: "Acme".to_string(),
            location: None,
            description: Some(description.to_string()),
            snippet: None,
            remote: false,
            job_type: None,
            salary_min: None,
            salary_max: None,
            salary_currency: None,
            apply_url: "https://example.com/apply".to_string(),
            posted_at: Utc::now(),
            visa_sponsorship: visa,
        }
    }

    #[test]
    fn test_backfill_fills_missing_visa() {
        let jobs = backfill_visa(vec![posting("We offer visa sponsorship", None)]);
        assert_eq!(jobs[0].visa_sponsorship, Some(VisaSponsorship::Yes));
    }

    #[test]
    fn test_backfill_reclassifies_unknown() {
        let jobs = backfill_visa(vec![posting(
            "Must be authorized to work in the US",
            Some(VisaSponsorship::Unknown),
        )]);
        assert_eq!(jobs[0].visa_sponsorship, Some(VisaSponsorship::No));
    }

    #[test]
    fn test_backfill_keeps_explicit_answer() {
        // An explicit provider answer wins over what the text would say.
        let jobs = backfill_visa(vec![posting(
            "No visa sponsorship available",
            Some(VisaSponsorship::Yes),
        )]);
        assert_eq!(jobs[0].visa_sponsorship, Some(VisaSponsorship::Yes));
    }
}
