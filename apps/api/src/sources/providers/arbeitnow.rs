use std::sync::LazyLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;

use crate::sources::visa::infer_visa_sponsorship;
use crate::sources::{backfill_visa, JobPosting, JobSearchQuery, JobSource, JobSourceResult};

const BASE_URL: &str = "https://www.arbeitnow.com/api/job-board-api";
const PAGE_SIZE: usize = 50;

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("static regex"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("static regex"));

#[derive(Debug, Deserialize)]
struct ArbeitnowJob {
    slug: String,
    company_name: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    remote: bool,
    url: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    job_types: Vec<String>,
    #[serde(default)]
    location: String,
    created_at: i64,
}

#[derive(Debug, Deserialize)]
struct ArbeitnowResponse {
    data: Vec<ArbeitnowJob>,
}

pub struct ArbeitnowProvider {
    client: Client,
}

impl ArbeitnowProvider {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
        }
    }
}

impl Default for ArbeitnowProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JobSource for ArbeitnowProvider {
    fn id(&self) -> &'static str {
        "arbeitnow"
    }

    fn name(&self) -> &'static str {
        "Arbeitnow"
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn fetch_jobs(&self, query: &JobSearchQuery) -> JobSourceResult {
        let response = match self
            .client
            .get(BASE_URL)
            .header("Accept", "application/json")
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => return JobSourceResult::from_error(format!("Arbeitnow fetch error: {e}")),
        };

        if !response.status().is_success() {
            return JobSourceResult::from_error(format!(
                "Arbeitnow API error: {}",
                response.status().as_u16()
            ));
        }

        let data: ArbeitnowResponse = match response.json().await {
            Ok(d) => d,
            Err(e) => return JobSourceResult::from_error(format!("Arbeitnow fetch error: {e}")),
        };

        let mut filtered = data.data;

        if !query.keywords.is_empty() {
            let keywords: Vec<String> = query
                .keywords
                .to_lowercase()
                .split_whitespace()
                .map(String::from)
                .collect();
            filtered.retain(|job| {
                let search_text = format!(
                    "{} {} {} {}",
                    job.title,
                    job.company_name,
                    job.tags.join(" "),
                    job.description
                )
                .to_lowercase();
                keywords.iter().any(|kw| search_text.contains(kw))
            });
        }

        if query.remote {
            filtered.retain(|job| job.remote);
        }

        if let Some(location) = &query.location {
            let location_lower = location.to_lowercase();
            filtered.retain(|job| {
                job.location.to_lowercase().contains(&location_lower)
                    || (location_lower.contains("remote") && job.remote)
            });
        }

        let total_found = filtered.len();
        let jobs: Vec<JobPosting> = filtered
            .into_iter()
            .take(PAGE_SIZE)
            .map(|job| {
                let full_text = format!("{} {}", job.description, job.tags.join(" "));
                let clean_description = WHITESPACE
                    .replace_all(&HTML_TAG.replace_all(&job.description, " "), " ")
                    .trim()
                    .to_string();
                let snippet = format!(
                    "{}...",
                    clean_description.chars().take(200).collect::<String>()
                );

                JobPosting {
                    external_id: format!("arbeitnow-{}", job.slug),
                    title: job.title,
                    company: job.company_name,
                    location: Some(if job.remote {
                        "Remote".to_string()
                    } else {
                        job.location
                    }),
                    description: Some(clean_description),
                    snippet: Some(snippet),
                    remote: job.remote,
                    job_type: job
                        .job_types
                        .first()
                        .cloned()
                        .or_else(|| Some("full-time".to_string())),
                    salary_min: None,
                    salary_max: None,
                    salary_currency: None,
                    apply_url: job.url,
                    posted_at: DateTime::from_timestamp(job.created_at, 0).unwrap_or_else(Utc::now),
                    visa_sponsorship: Some(infer_visa_sponsorship(&full_text)),
                }
            })
            .collect();

        JobSourceResult {
            jobs: backfill_visa(jobs),
            total_found: Some(total_found),
            has_more: Some(total_found > PAGE_SIZE),
            error: None,
        }
    }
}
