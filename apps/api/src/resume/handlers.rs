use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::ResumeRow;
use crate::resume::extract::FileType;
use crate::resume::parser::parse_resume;
use crate::resume::types::ResumeProfile;
use crate::state::AppState;

#[derive(Serialize)]
pub struct ResumeUploadResponse {
    pub resume: ResumeRow,
    pub profile: ResumeProfile,
    pub warnings: Vec<String>,
}

/// POST /api/v1/resumes/upload
///
/// Accepts a multipart PDF or DOCX upload, parses it into a profile, and
/// persists the result. A résumé that parses to nothing still gets stored
/// (with status 'failed') so the caller can inspect what happened.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ResumeUploadResponse>), AppError> {
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") || field.file_name().is_some() {
            let filename = field.file_name().unwrap_or("resume").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
            file = Some((filename, data.to_vec()));
            break;
        }
    }

    let (filename, data) = file.ok_or_else(|| AppError::Validation("No file provided".to_string()))?;

    if data.len() > state.config.max_upload_bytes {
        return Err(AppError::Validation(format!(
            "File too large. Maximum size is {}MB",
            state.config.max_upload_bytes / (1024 * 1024)
        )));
    }

    let file_type = FileType::from_extension(&filename).ok_or_else(|| {
        AppError::Validation("Unsupported file type. Please upload a PDF or DOCX file.".to_string())
    })?;

    // PDF/DOCX extraction is CPU-bound; keep it off the async executor.
    let file_size = data.len() as i64;
    let parse_result = tokio::task::spawn_blocking(move || parse_resume(&data, file_type))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Parse task failed: {e}")))?;

    let parse_status = if parse_result.success {
        if parse_result.warnings.is_empty() {
            "success"
        } else {
            "partial"
        }
    } else {
        "failed"
    };

    let resume: ResumeRow = sqlx::query_as(
        r#"
        INSERT INTO resumes
            (id, filename, file_type, file_size, parse_status, parse_error, raw_text, profile)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&filename)
    .bind(file_type.as_str())
    .bind(file_size)
    .bind(parse_status)
    .bind(&parse_result.error)
    .bind((!parse_result.raw_text.is_empty()).then_some(parse_result.raw_text.as_str()))
    .bind(serde_json::to_value(&parse_result.profile).unwrap_or(json!({})))
    .fetch_one(&state.db)
    .await?;

    tracing::info!(
        "Parsed resume '{}' ({}, {} bytes): status={}",
        filename,
        file_type.as_str(),
        file_size,
        parse_status
    );

    Ok((
        StatusCode::CREATED,
        Json(ResumeUploadResponse {
            resume,
            profile: parse_result.profile,
            warnings: parse_result.warnings,
        }),
    ))
}

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
) -> Result<Json<Vec<ResumeRow>>, AppError> {
    let resumes: Vec<ResumeRow> =
        sqlx::query_as("SELECT * FROM resumes ORDER BY created_at DESC")
            .fetch_all(&state.db)
            .await?;
    Ok(Json(resumes))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ResumeRow>, AppError> {
    let resume: Option<ResumeRow> = sqlx::query_as("SELECT * FROM resumes WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?;
    resume
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))
}

/// DELETE /api/v1/resumes/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM resumes WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Resume {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}
