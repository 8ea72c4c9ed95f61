use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// A stored résumé upload. The structured profile extracted at upload time
/// is embedded as JSON; re-parsing creates a new row rather than patching
/// this one.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub filename: String,
    pub file_type: String,
    pub file_size: i64,
    /// 'success' | 'partial' | 'failed'
    pub parse_status: String,
    pub parse_error: Option<String>,
    pub raw_text: Option<String>,
    pub profile: Value,
    pub created_at: DateTime<Utc>,
}
