use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::queries::get_recent_jobs;
use crate::models::job::JobRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct JobListQuery {
    pub search_id: Option<Uuid>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Serialize)]
pub struct JobListResponse {
    pub jobs: Vec<JobRow>,
    pub total: i64,
}

/// GET /api/v1/jobs lists recent jobs (last 7 days), newest first.
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(params): Query<JobListQuery>,
) -> Result<Json<JobListResponse>, AppError> {
    let limit = params.limit.unwrap_or(50).clamp(1, 200);
    let offset = params.offset.unwrap_or(0).max(0);
    let (jobs, total) = get_recent_jobs(&state.db, params.search_id, limit, offset).await?;
    Ok(Json(JobListResponse { jobs, total }))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobRow>, AppError> {
    let job: Option<JobRow> = sqlx::query_as("SELECT * FROM jobs WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?;
    job.map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))
}

/// DELETE /api/v1/jobs/:id is an admin removal; the pipeline itself never
/// deletes jobs.
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Job {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}
