//! CRUD for saved searches. These rows are owned by the admin layer; the
//! ingestion pipeline only reads them.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::search::{SearchRow, SearchWithCountRow};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateSearchRequest {
    pub name: String,
    pub keywords: String,
    pub location: Option<String>,
    #[serde(default)]
    pub remote: bool,
    #[serde(default)]
    pub providers: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateSearchRequest {
    pub name: Option<String>,
    pub keywords: Option<String>,
    pub location: Option<String>,
    pub remote: Option<bool>,
    pub providers: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

fn default_true() -> bool {
    true
}

/// Rejects malformed requests before any side effect.
fn validate_search(name: &str, keywords: &str, location: Option<&str>) -> Result<(), AppError> {
    if name.is_empty() || name.len() > 100 {
        return Err(AppError::Validation(
            "name must be between 1 and 100 characters".to_string(),
        ));
    }
    if keywords.is_empty() || keywords.len() > 500 {
        return Err(AppError::Validation(
            "keywords must be between 1 and 500 characters".to_string(),
        ));
    }
    if location.is_some_and(|l| l.len() > 100) {
        return Err(AppError::Validation(
            "location must be at most 100 characters".to_string(),
        ));
    }
    Ok(())
}

/// GET /api/v1/searches lists searches newest first, with job counts.
pub async fn handle_list_searches(
    State(state): State<AppState>,
) -> Result<Json<Vec<SearchWithCountRow>>, AppError> {
    let searches: Vec<SearchWithCountRow> = sqlx::query_as(
        r#"
        SELECT s.*, (SELECT COUNT(*) FROM search_jobs sj WHERE sj.search_id = s.id) AS job_count
        FROM searches s
        ORDER BY s.created_at DESC
        "#,
    )
    .fetch_all(&state.db)
    .await?;
    Ok(Json(searches))
}

/// POST /api/v1/searches
pub async fn handle_create_search(
    State(state): State<AppState>,
    Json(req): Json<CreateSearchRequest>,
) -> Result<(StatusCode, Json<SearchRow>), AppError> {
    validate_search(&req.name, &req.keywords, req.location.as_deref())?;

    let search: SearchRow = sqlx::query_as(
        r#"
        INSERT INTO searches (id, name, keywords, location, remote, providers, is_active)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&req.name)
    .bind(&req.keywords)
    .bind(&req.location)
    .bind(req.remote)
    .bind(json!(req.providers))
    .bind(req.is_active)
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(search)))
}

/// GET /api/v1/searches/:id
pub async fn handle_get_search(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SearchRow>, AppError> {
    let search: Option<SearchRow> = sqlx::query_as("SELECT * FROM searches WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?;
    search
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Search {id} not found")))
}

/// PATCH /api/v1/searches/:id
pub async fn handle_update_search(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateSearchRequest>,
) -> Result<Json<SearchRow>, AppError> {
    let existing: Option<SearchRow> = sqlx::query_as("SELECT * FROM searches WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?;
    let existing = existing.ok_or_else(|| AppError::NotFound(format!("Search {id} not found")))?;

    let name = req.name.unwrap_or(existing.name);
    let keywords = req.keywords.unwrap_or(existing.keywords);
    let location = req.location.or(existing.location);
    let remote = req.remote.unwrap_or(existing.remote);
    let providers = match req.providers {
        Some(p) => json!(p),
        None => existing.providers,
    };
    let is_active = req.is_active.unwrap_or(existing.is_active);

    validate_search(&name, &keywords, location.as_deref())?;

    let updated: SearchRow = sqlx::query_as(
        r#"
        UPDATE searches
        SET name = $2, keywords = $3, location = $4, remote = $5, providers = $6, is_active = $7
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&name)
    .bind(&keywords)
    .bind(&location)
    .bind(remote)
    .bind(providers)
    .bind(is_active)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(updated))
}

/// DELETE /api/v1/searches/:id. Associations cascade in the schema.
pub async fn handle_delete_search(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM searches WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Search {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_rejects_empty_name() {
        assert!(validate_search("", "rust", None).is_err());
    }

    #[test]
    fn test_validation_rejects_long_name() {
        assert!(validate_search(&"x".repeat(101), "rust", None).is_err());
    }

    #[test]
    fn test_validation_rejects_empty_keywords() {
        assert!(validate_search("My search", "", None).is_err());
    }

    #[test]
    fn test_validation_rejects_long_location() {
        assert!(validate_search("My search", "rust", Some(&"x".repeat(101))).is_err());
    }

    #[test]
    fn test_validation_accepts_reasonable_input() {
        assert!(validate_search("Rust jobs", "rust backend", Some("Berlin")).is_ok());
    }
}
