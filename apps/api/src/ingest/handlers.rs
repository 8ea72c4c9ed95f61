use axum::{
    extract::State,
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::ingest::service::{
    fetch_all_active_searches, fetch_from_provider, fetch_jobs_for_search, FetchResult,
    FetchSummary,
};
use crate::models::job::FetchLogRow;
use crate::sources::JobSearchQuery;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct AdminFetchRequest {
    pub provider_id: Option<String>,
    pub search_id: Option<Uuid>,
    #[serde(default)]
    pub keywords: String,
    pub location: Option<String>,
    #[serde(default)]
    pub remote: bool,
}

#[derive(Serialize)]
pub struct AdminFetchResponse {
    pub success: bool,
    pub summary: FetchSummary,
    pub results: Vec<FetchResult>,
}

#[derive(Serialize)]
pub struct ProviderInfo {
    pub id: String,
    pub name: String,
    pub available: bool,
}

fn verify_admin_key(state: &AppState, headers: &HeaderMap) -> Result<(), AppError> {
    let Some(expected) = &state.config.admin_api_key else {
        return Ok(()); // no key configured, trigger stays open (dev behavior)
    };
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|token| token == expected);
    if authorized {
        Ok(())
    } else {
        Err(AppError::Unauthorized)
    }
}

/// POST /api/v1/admin/fetch
///
/// With a `provider_id`, runs that one provider with the ad hoc query; with
/// a `search_id`, runs that search; otherwise runs every active search.
pub async fn handle_admin_fetch(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Option<Json<AdminFetchRequest>>,
) -> Result<Json<AdminFetchResponse>, AppError> {
    verify_admin_key(&state, &headers)?;
    let request = body.map(|Json(r)| r).unwrap_or_default();

    let results = if let Some(provider_id) = &request.provider_id {
        let query = JobSearchQuery {
            keywords: request.keywords.clone(),
            location: request.location.clone(),
            remote: request.remote,
        };
        vec![fetch_from_provider(&state.db, &state.registry, provider_id, &query, None).await]
    } else if let Some(search_id) = request.search_id {
        fetch_jobs_for_search(&state.db, &state.registry, search_id).await?
    } else {
        fetch_all_active_searches(&state.db, &state.registry).await?
    };

    let summary = FetchSummary::from_results(&results);
    Ok(Json(AdminFetchResponse {
        success: true,
        summary,
        results,
    }))
}

/// GET /api/v1/providers
pub async fn handle_list_providers(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProviderInfo>>, AppError> {
    let providers = state
        .registry
        .get_all()
        .iter()
        .map(|p| ProviderInfo {
            id: p.id().to_string(),
            name: p.name().to_string(),
            available: p.is_available(),
        })
        .collect();
    Ok(Json(providers))
}

#[derive(Debug, Deserialize)]
pub struct FetchLogQuery {
    pub search_id: Option<Uuid>,
    pub limit: Option<i64>,
}

/// GET /api/v1/admin/fetch-logs lists recent audit records, newest first.
pub async fn handle_list_fetch_logs(
    State(state): State<AppState>,
    headers: HeaderMap,
    axum::extract::Query(params): axum::extract::Query<FetchLogQuery>,
) -> Result<Json<Vec<FetchLogRow>>, AppError> {
    verify_admin_key(&state, &headers)?;
    let limit = params.limit.unwrap_or(50).clamp(1, 500);

    let logs: Vec<FetchLogRow> = match params.search_id {
        Some(search_id) => {
            sqlx::query_as(
                "SELECT * FROM fetch_logs WHERE search_id = $1 ORDER BY created_at DESC LIMIT $2",
            )
            .bind(search_id)
            .bind(limit)
            .fetch_all(&state.db)
            .await?
        }
        None => {
            sqlx::query_as("SELECT * FROM fetch_logs ORDER BY created_at DESC LIMIT $1")
                .bind(limit)
                .fetch_all(&state.db)
                .await?
        }
    };
    Ok(Json(logs))
}
