use crate::dto::auth_dto::LoginPayload;
use crate::dto::response;
use crate::{error::Result, AppState};
use axum::{extract::State, response::IntoResponse, Json};
use validator::Validate;

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let login = state.auth_service.login(payload).await?;
    Ok(response::ok(login))
}
