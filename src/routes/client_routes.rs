use crate::dto::client_dto::RegisterClientPayload;
use crate::dto::response;
use crate::error::Result;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

#[axum::debug_handler]
pub async fn register_client(
    State(state): State<AppState>,
    Json(payload): Json<RegisterClientPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let client = state.client_service.register(payload).await?;
    Ok((StatusCode::CREATED, response::ok(client)))
}

pub async fn list_clients(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let clients = state.client_service.list().await?;
    Ok(response::ok(clients))
}

pub async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let client = state.client_service.get(id).await?;
    Ok(response::ok(client))
}
