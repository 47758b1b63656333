use axum::{extract::State, http::StatusCode, Json};
use tracing::instrument;

use crate::error::ApiError;
use crate::state::AppState;
use crate::users::dto::{LoginRequest, MessageResponse, RegisterRequest};

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let email = payload.email.trim().to_lowercase();

    state
        .users
        .register(payload.name, &email, &payload.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User registered successfully".into(),
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let email = payload.email.trim().to_lowercase();

    let user = state.users.authenticate(&email, &payload.password).await?;

    // Records created without a name fall back to the email in the greeting.
    let name = user.name.as_deref().unwrap_or(&user.email);
    Ok(Json(MessageResponse {
        message: format!("Welcome {}!", name),
    }))
}
