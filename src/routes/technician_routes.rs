use crate::dto::response;
use crate::error::Result;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTechnicianPayload {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    pub specialization: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct UpdateTechnicianPayload {
    pub name: Option<String>,
    pub specialization: Option<String>,
    pub status: Option<String>,
}

pub async fn list_technicians(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let technicians = state.technician_service.list().await?;
    Ok(response::ok(technicians))
}

pub async fn get_technician(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let technician = state.technician_service.get(id).await?;
    Ok(response::ok(technician))
}

#[axum::debug_handler]
pub async fn create_technician(
    State(state): State<AppState>,
    Json(payload): Json<CreateTechnicianPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let technician = state
        .technician_service
        .create(
            payload.name,
            payload.email,
            payload.password,
            payload.specialization,
        )
        .await?;
    Ok((StatusCode::CREATED, response::ok(technician)))
}

#[axum::debug_handler]
pub async fn update_technician(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTechnicianPayload>,
) -> Result<impl IntoResponse> {
    let technician = state
        .technician_service
        .update(id, payload.name, payload.specialization, payload.status)
        .await?;
    Ok(response::ok(technician))
}

#[axum::debug_handler]
pub async fn delete_technician(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.technician_service.deactivate(id).await?;
    Ok(response::message("Technician deactivated"))
}
