use crate::dto::notification_dto::{RegisterDevicePayload, UnreadCountResponse};
use crate::dto::response;
use crate::error::Result;
use crate::middleware::auth::Claims;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use validator::Validate;

pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let notifications = state
        .notification_service
        .list_for_user(claims.subject_id()?, claims.role())
        .await?;
    Ok(response::ok(notifications))
}

pub async fn unread_count(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let unread = state
        .notification_service
        .unread_count(claims.subject_id()?, claims.role())
        .await?;
    Ok(response::ok(UnreadCountResponse { unread }))
}

#[axum::debug_handler]
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state
        .notification_service
        .mark_read(id, claims.subject_id()?, claims.role())
        .await?;
    Ok(response::message("Notification marked as read"))
}

#[axum::debug_handler]
pub async fn mark_all_read(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let updated = state
        .notification_service
        .mark_all_read(claims.subject_id()?, claims.role())
        .await?;
    Ok(response::message(format!(
        "{} notifications marked as read",
        updated
    )))
}

#[axum::debug_handler]
pub async fn register_device(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<RegisterDevicePayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let device = state
        .notification_service
        .register_device(claims.subject_id()?, claims.role(), &payload.token)
        .await?;
    Ok((StatusCode::CREATED, response::ok(device)))
}
