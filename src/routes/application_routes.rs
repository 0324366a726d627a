use crate::dto::application_dto::{
    ApplicationListQuery, ApprovePayload, RejectPayload, SubmitApplicationPayload,
    SubmitApplicationResponse, UpdateStatusPayload,
};
use crate::dto::response;
use crate::error::{Error, Result};
use crate::models::application::{ApplicationStatus, DocumentRef};
use crate::AppState;
use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::path::Path as StdPath;
use tokio::fs;
use validator::Validate;

#[axum::debug_handler]
pub async fn submit_application(
    State(state): State<AppState>,
    Json(payload): Json<SubmitApplicationPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let application = state.application_service.create(payload).await?;
    tracing::info!(application_id = application.id, "Application submitted");
    Ok((
        StatusCode::CREATED,
        response::ok(SubmitApplicationResponse {
            id: application.id,
            status: application.status,
        }),
    ))
}

async fn save_document_file(filename: &str, data: &[u8]) -> Result<String> {
    let ext = StdPath::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_else(|| "bin".to_string());

    let allowed_exts = ["pdf", "doc", "docx", "txt", "rtf", "jpg", "jpeg", "png", "webp"];
    if !allowed_exts.contains(&ext.as_str()) {
        return Err(Error::BadRequest(format!(
            "File type .{} is not allowed",
            ext
        )));
    }

    if ext == "pdf" && !data.starts_with(b"%PDF") {
        return Err(Error::BadRequest("Invalid PDF file content".into()));
    }
    if (ext == "jpg" || ext == "jpeg") && !data.starts_with(&[0xFF, 0xD8]) {
        return Err(Error::BadRequest("Invalid JPEG file content".into()));
    }
    if ext == "png" && !data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
        return Err(Error::BadRequest("Invalid PNG file content".into()));
    }

    let upload_dir = format!("{}/documents", crate::config::get_config().uploads_dir);
    fs::create_dir_all(&upload_dir)
        .await
        .map_err(|e| Error::Internal(e.to_string()))?;

    let file_id = uuid::Uuid::new_v4();
    let safe_filename = format!("{}.{}", file_id, ext);
    let file_path = format!("{}/{}", upload_dir, safe_filename);

    fs::write(&file_path, data).await.map_err(|e| {
        tracing::error!("Failed to write document file: {}", e);
        Error::Internal(format!("Failed to save file: {}", e))
    })?;

    Ok(file_path)
}

/// Stores an uploaded application document and hands back the opaque
/// reference the submission payload embeds.
pub async fn upload_document(
    State(_state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::BadRequest(e.to_string()))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("document.bin").to_string();
            let mime_type = field.content_type().map(|m| m.to_string());
            let data = field.bytes().await.map_err(|e| {
                tracing::error!("Failed to read document bytes: {}", e);
                Error::BadRequest("Failed to read file upload".into())
            })?;
            if data.is_empty() {
                continue;
            }

            let path = save_document_file(&filename, &data).await?;
            let document = DocumentRef {
                url: path,
                file_name: Some(filename),
                mime_type,
                size_bytes: Some(data.len() as i64),
            };
            return Ok((StatusCode::CREATED, response::ok(document)));
        }
    }
    Err(Error::BadRequest("No valid document provided".into()))
}

fn parse_status(raw: &str) -> Result<ApplicationStatus> {
    raw.parse().map_err(Error::BadRequest)
}

pub async fn list_applications(
    State(state): State<AppState>,
    Query(query): Query<ApplicationListQuery>,
) -> Result<impl IntoResponse> {
    let status = query.status.as_deref().map(parse_status).transpose()?;
    let applications = state.application_service.list(status).await?;
    Ok(response::ok(applications))
}

pub async fn get_application(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let application = state.application_service.get(id).await?;
    Ok(response::ok(application))
}

#[axum::debug_handler]
pub async fn approve_application(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ApprovePayload>,
) -> Result<impl IntoResponse> {
    let (application, technician) = state.application_service.approve(id, payload.notes).await?;

    // Dispatch only after the transaction committed; delivery failures are
    // the dispatcher's problem, not the approval's.
    state
        .notification_service
        .notify_status_change(&application, ApplicationStatus::Approved)
        .await;

    Ok(response::ok(json!({
        "application": application,
        "technician": {
            "id": technician.id,
            "name": technician.name,
            "email": technician.email,
        },
    })))
}

#[axum::debug_handler]
pub async fn reject_application(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<RejectPayload>,
) -> Result<impl IntoResponse> {
    let application = state.application_service.reject(id, &payload.notes).await?;

    state
        .notification_service
        .notify_status_change(&application, ApplicationStatus::Rejected)
        .await;

    Ok(response::ok(application))
}

#[axum::debug_handler]
pub async fn update_application_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateStatusPayload>,
) -> Result<impl IntoResponse> {
    let new_status = parse_status(&payload.status)?;
    let application = state
        .application_service
        .update_status(id, new_status, payload.notes)
        .await?;

    state
        .notification_service
        .notify_status_change(&application, new_status)
        .await;

    Ok(response::ok(application))
}

pub async fn dashboard_stats(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let applications = state.application_service.status_counts().await?;
    let requests = state.request_service.status_counts().await?;
    Ok(response::ok(json!({
        "applications": applications,
        "requests": requests,
    })))
}
