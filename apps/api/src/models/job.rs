use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A stored job posting. One row per unique `dedup_hash`; repeated sightings
/// of the same posting refresh the volatile fields in place.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub external_id: String,
    pub source: String,
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
    pub visa_sponsorship: String,
    pub dedup_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Slim projection of a job used by the matching scorer.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct JobForMatchingRow {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub snippet: Option<String>,
    pub remote: bool,
}

/// Append-only audit record: one row per provider invocation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FetchLogRow {
    pub id: Uuid,
    pub search_id: Option<Uuid>,
    pub provider: String,
    pub success: bool,
    pub jobs_found: i32,
    pub jobs_new: i32,
    pub error: Option<String>,
    pub duration_ms: i64,
    pub created_at: DateTime<Utc>,
}
