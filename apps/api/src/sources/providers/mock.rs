//! Local-test provider generating synthetic postings. Useful for exercising
//! the ingestion pipeline and visa heuristics without touching the network.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use crate::sources::{backfill_visa, JobPosting, JobSearchQuery, JobSource, JobSourceResult};

const COMPANIES: &[&str] = &[
    "TechCorp Inc.",
    "Digital Solutions Ltd.",
    "Cloud Nine Systems",
    "Data Dynamics",
    "Innovative Labs",
    "Future Technologies",
    "Smart Software Co.",
    "DevOps Masters",
    "AI Ventures",
    "CodeCraft Studios",
    "Quantum Computing Corp",
    "Neural Networks Inc.",
];

const TITLES: &[&str] = &[
    "Senior Software Engineer",
    "Full Stack Developer",
    "Frontend Engineer",
    "Backend Developer",
    "DevOps Engineer",
    "Data Scientist",
    "Machine Learning Engineer",
    "Product Manager",
    "Engineering Manager",
    "Site Reliability Engineer",
    "Cloud Architect",
    "Security Engineer",
];

const LOCATIONS: &[&str] = &[
    "San Francisco, CA",
    "New York, NY",
    "Seattle, WA",
    "Austin, TX",
    "Boston, MA",
    "Denver, CO",
    "Chicago, IL",
    "Remote",
];

// Descriptions deliberately include sponsorship phrasing in both directions
// so the visa classifier gets exercised end-to-end.
const DESCRIPTIONS: &[&str] = &[
    "We are looking for a talented engineer to join our growing team. Visa sponsorship available for qualified candidates.",
    "Join our innovative team and help shape the future of technology. Must be authorized to work in the US.",
    "Exciting opportunity to work with modern tech stack. H1B sponsorship provided for exceptional candidates.",
    "Be part of a fast-growing startup with amazing culture. No visa sponsorship available at this time.",
    "Leading tech company seeking experienced professionals. Will sponsor visa for the right candidate.",
];

pub struct MockProvider;

impl MockProvider {
    pub fn new() -> Self {
        MockProvider
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JobSource for MockProvider {
    fn id(&self) -> &'static str {
        "mock"
    }

    fn name(&self) -> &'static str {
        "Mock Jobs"
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn fetch_jobs(&self, query: &JobSearchQuery) -> JobSourceResult {
        let mut rng = rand::thread_rng();
        let job_count = rng.gen_range(5..15);
        let mut jobs = Vec::with_capacity(job_count);

        for i in 0..job_count {
            let company = *COMPANIES.choose(&mut rng).unwrap();
            let base_title = *TITLES.choose(&mut rng).unwrap();
            let location = *LOCATIONS.choose(&mut rng).unwrap();
            let description = *DESCRIPTIONS.choose(&mut rng).unwrap();

            // Echo the first query keyword into roughly half the titles so
            // keyword-driven searches get plausible hits.
            let title = match query.keywords.split_whitespace().next() {
                Some(kw) if rng.gen_bool(0.5) => format!("{base_title} - {kw}"),
                _ => base_title.to_string(),
            };

            let days_ago = rng.gen_range(0..10);
            let posted_at = Utc::now() - Duration::days(days_ago);
            let is_remote = location == "Remote" || rng.gen_bool(0.3);

            jobs.push(JobPosting {
                external_id: format!("mock-{}-{i}", Uuid::new_v4().simple()),
                title,
                company: company.to_string(),
                location: Some(if is_remote { "Remote".to_string() } else { location.to_string() }),
                description: Some(description.to_string()),
                snippet: Some(format!(
                    "{}...",
                    description.chars().take(150).collect::<String>()
                )),
                remote: is_remote,
                job_type: Some(if rng.gen_bool(0.8) { "full-time" } else { "contract" }.to_string()),
                salary_min: Some(80_000 + rng.gen_range(0..100_000)),
                salary_max: Some(120_000 + rng.gen_range(0..150_000)),
                salary_currency: Some("USD".to_string()),
                apply_url: format!("https://example.com/apply/{}", Uuid::new_v4().simple()),
                posted_at,
                visa_sponsorship: None,
            });
        }

        let mut filtered: Vec<JobPosting> = match &query.location {
            Some(location) => {
                let location_lower = location.to_lowercase();
                jobs.into_iter()
                    .filter(|job| {
                        job.location
                            .as_deref()
                            .is_some_and(|l| l.to_lowercase().contains(&location_lower))
                            || (location_lower.contains("remote") && job.remote)
                    })
                    .collect()
            }
            None => jobs,
        };

        if query.remote {
            filtered.retain(|job| job.remote);
        }

        let total = filtered.len();
        JobSourceResult {
            jobs: backfill_visa(filtered),
            total_found: Some(total),
            has_more: Some(false),
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::VisaSponsorship;

    #[tokio::test]
    async fn test_fetch_returns_jobs_with_visa_classified() {
        let provider = MockProvider::new();
        let result = provider
            .fetch_jobs(&JobSearchQuery {
                keywords: "rust".to_string(),
                location: None,
                remote: false,
            })
            .await;

        assert!(result.error.is_none());
        assert!(!result.jobs.is_empty());
        // Every mock description matches either a YES or a NO pattern.
        for job in &result.jobs {
            assert_ne!(job.visa_sponsorship, None);
            assert_ne!(job.visa_sponsorship, Some(VisaSponsorship::Unknown));
        }
    }

    #[tokio::test]
    async fn test_remote_filter_only_returns_remote_jobs() {
        let provider = MockProvider::new();
        let result = provider
            .fetch_jobs(&JobSearchQuery {
                keywords: String::new(),
                location: None,
                remote: true,
            })
            .await;

        assert!(result.jobs.iter().all(|j| j.remote));
    }

    #[tokio::test]
    async fn test_remote_location_filter_admits_remote_jobs() {
        let provider = MockProvider::new();
        let result = provider
            .fetch_jobs(&JobSearchQuery {
                keywords: String::new(),
                location: Some("Remote".to_string()),
                remote: false,
            })
            .await;

        for job in &result.jobs {
            let location_matches = job
                .location
                .as_deref()
                .is_some_and(|l| l.to_lowercase().contains("remote"));
            assert!(location_matches || job.remote);
        }
    }
}
