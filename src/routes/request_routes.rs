use crate::dto::request_dto::{
    AddNotePayload, AssignRequestPayload, CreateRequestPayload, UpdateRequestStatusPayload,
};
use crate::dto::response;
use crate::error::{Error, Result};
use crate::middleware::auth::Claims;
use crate::models::service_request::ServiceRequest;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

fn can_view(claims: &Claims, subject: Uuid, request: &ServiceRequest) -> bool {
    match claims.role() {
        "admin" => true,
        "client" => request.client_id == subject,
        "technician" => request.technician_id == Some(subject),
        _ => false,
    }
}

#[axum::debug_handler]
pub async fn create_request(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateRequestPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    if claims.role() != "client" {
        return Err(Error::Forbidden(
            "Only clients can open service requests".to_string(),
        ));
    }
    let client_id = claims.subject_id()?;
    let request = state.request_service.create(client_id, payload).await?;

    state.notification_service.notify_new_request(&request).await;

    Ok((StatusCode::CREATED, response::ok(request)))
}

pub async fn list_requests(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let subject = claims.subject_id()?;
    let requests = match claims.role() {
        "admin" => state.request_service.list_all().await?,
        "technician" => state.request_service.list_for_technician(subject).await?,
        _ => state.request_service.list_for_client(subject).await?,
    };
    Ok(response::ok(requests))
}

pub async fn get_request(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let request = state.request_service.get(id).await?;
    if !can_view(&claims, claims.subject_id()?, &request) {
        return Err(Error::Forbidden("Not your request".to_string()));
    }
    Ok(response::ok(request))
}

#[axum::debug_handler]
pub async fn update_request_status(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRequestStatusPayload>,
) -> Result<impl IntoResponse> {
    let subject = claims.subject_id()?;
    let request = state.request_service.get(id).await?;
    let allowed = match claims.role() {
        "admin" => true,
        "technician" => request.technician_id == Some(subject),
        _ => false,
    };
    if !allowed {
        return Err(Error::Forbidden(
            "Only the assigned technician or an admin can update a request".to_string(),
        ));
    }

    let updated = state
        .request_service
        .update_status(id, &payload.status)
        .await?;

    state
        .notification_service
        .notify_request_update(&updated)
        .await;

    Ok(response::ok(updated))
}

#[axum::debug_handler]
pub async fn assign_request(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignRequestPayload>,
) -> Result<impl IntoResponse> {
    let request = state
        .request_service
        .assign(id, payload.technician_id)
        .await?;
    Ok(response::ok(request))
}

pub async fn list_notes(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let request = state.request_service.get(id).await?;
    if !can_view(&claims, claims.subject_id()?, &request) {
        return Err(Error::Forbidden("Not your request".to_string()));
    }
    let notes = state.request_service.list_notes(id).await?;
    Ok(response::ok(notes))
}

#[axum::debug_handler]
pub async fn add_note(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddNotePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let subject = claims.subject_id()?;
    let request = state.request_service.get(id).await?;
    if !can_view(&claims, subject, &request) {
        return Err(Error::Forbidden("Not your request".to_string()));
    }
    let note = state
        .request_service
        .add_note(id, subject, claims.role(), &payload.body)
        .await?;
    Ok((StatusCode::CREATED, response::ok(note)))
}
