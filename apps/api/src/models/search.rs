use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// A saved search configuration. Owned by the admin layer; the ingestion
/// pipeline only ever reads these rows.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SearchRow {
    pub id: Uuid,
    pub name: String,
    pub keywords: String,
    pub location: Option<String>,
    pub remote: bool,
    /// JSON array of enabled provider ids.
    pub providers: Value,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl SearchRow {
    /// Decodes the stored provider-id list. Malformed JSON degrades to an
    /// empty list, which the registry treats as "all available providers".
    pub fn provider_ids(&self) -> Vec<String> {
        serde_json::from_value(self.providers.clone()).unwrap_or_default()
    }
}

/// Search row joined with its associated job count, for listings.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SearchWithCountRow {
    pub id: Uuid,
    pub name: String,
    pub keywords: String,
    pub location: Option<String>,
    pub remote: bool,
    pub providers: Value,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub job_count: i64,
}
