use std::sync::LazyLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;

use crate::sources::visa::infer_visa_sponsorship;
use crate::sources::{backfill_visa, JobPosting, JobSearchQuery, JobSource, JobSourceResult};

const BASE_URL: &str = "https://remoteok.com/api";
const PAGE_SIZE: usize = 50;

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("static regex"));

/// Wire shape of a RemoteOK listing. The first array element is metadata
/// (a legal notice), so every field defaults.
#[derive(Debug, Deserialize)]
struct RemoteOkJob {
    /// Upstream sends this as either a string or a number.
    #[serde(default)]
    id: serde_json::Value,
    #[serde(default)]
    epoch: i64,
    #[serde(default)]
    company: String,
    #[serde(default)]
    position: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    location: String,
    #[serde(default)]
    salary_min: Option<i64>,
    #[serde(default)]
    salary_max: Option<i64>,
    #[serde(default)]
    url: String,
    #[serde(default)]
    apply_url: Option<String>,
}

impl RemoteOkJob {
    fn id_string(&self) -> String {
        match &self.id {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Number(n) => n.to_string(),
            _ => String::new(),
        }
    }
}

pub struct RemoteOkProvider {
    client: Client,
}

impl RemoteOkProvider {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
        }
    }
}

impl Default for RemoteOkProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JobSource for RemoteOkProvider {
    fn id(&self) -> &'static str {
        "remoteok"
    }

    fn name(&self) -> &'static str {
        "RemoteOK"
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn fetch_jobs(&self, query: &JobSearchQuery) -> JobSourceResult {
        let response = match self
            .client
            .get(BASE_URL)
            .header("User-Agent", "JobFinder/1.0")
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => return JobSourceResult::from_error(format!("RemoteOK fetch error: {e}")),
        };

        if !response.status().is_success() {
            return JobSourceResult::from_error(format!(
                "RemoteOK API error: {}",
                response.status().as_u16()
            ));
        }

        let data: Vec<RemoteOkJob> = match response.json().await {
            Ok(d) => d,
            Err(e) => return JobSourceResult::from_error(format!("RemoteOK fetch error: {e}")),
        };

        // First element is metadata, skip it.
        let listings = data.into_iter().skip(1);

        let filtered: Vec<RemoteOkJob> = if query.keywords.is_empty() {
            listings.collect()
        } else {
            let keywords: Vec<String> = query
                .keywords
                .to_lowercase()
                .split_whitespace()
                .map(String::from)
                .collect();
            listings
                .filter(|job| {
                    let search_text = format!(
                        "{} {} {} {}",
                        job.position,
                        job.company,
                        job.tags.join(" "),
                        job.description
                    )
                    .to_lowercase();
                    keywords.iter().any(|kw| search_text.contains(kw))
                })
                .collect()
        };

        let total_found = filtered.len();
        let jobs: Vec<JobPosting> = filtered
            .into_iter()
            .take(PAGE_SIZE)
            .map(|job| {
                let full_text = format!("{} {}", job.description, job.tags.join(", "));
                let raw_snippet: String = job.description.chars().take(200).collect();
                let snippet = format!("{}...", HTML_TAG.replace_all(&raw_snippet, ""));

                JobPosting {
                    external_id: format!("remoteok-{}", job.id_string()),
                    title: job.position,
                    company: job.company,
                    location: Some(if job.location.is_empty() {
                        "Remote".to_string()
                    } else {
                        job.location
                    }),
                    description: Some(job.description),
                    snippet: Some(snippet),
                    remote: true,
                    job_type: Some("full-time".to_string()),
                    salary_min: job.salary_min,
                    salary_max: job.salary_max,
                    salary_currency: Some("USD".to_string()),
                    apply_url: job.apply_url.unwrap_or(job.url),
                    posted_at: DateTime::from_timestamp(job.epoch, 0).unwrap_or_else(Utc::now),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format_tolerates_metadata_element() {
        // The real feed starts with a legal-notice object carrying none of
        // the job fields.
        let payload = r#"[
            {"legal": "some notice"},
            {"id": 123, "epoch": 1700000000, "company": "Acme", "position": "Rust Engineer",
             "tags": ["rust", "backend"], "description": "<p>Visa sponsorship available</p>",
             "location": "Worldwide", "url": "https://remoteok.com/l/123"}
        ]"#;
        let data: Vec<RemoteOkJob> = serde_json::from_str(payload).unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[1].id_string(), "123");
        assert_eq!(data[1].company, "Acme");
    }

    #[test]
    fn test_id_string_accepts_string_ids() {
        let job: RemoteOkJob = serde_json::from_str(r#"{"id": "abc-1"}"#).unwrap();
        assert_eq!(job.id_string(), "abc-1");
    }

    #[test]
    fn test_html_is_stripped_from_snippet() {
        let raw = "<p>Build <b>things</b></p>";
        assert_eq!(HTML_TAG.replace_all(raw, ""), "Build things");
    }
}
