use axum::{
    extract::{FromRef, State},
    routing::post,
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::{
        dto::LoginRequest,
        jwt::JwtKeys,
        services::{authenticate, create_user},
    },
    error::ApiError,
    extract::ApiJson,
    state::AppState,
    users::{dto::UserResponse, schema::CreateUser},
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register/", post(register))
        .route("/login/", post(login))
}

#[instrument(skip(state, input))]
pub async fn register(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateUser>,
) -> Result<Json<UserResponse>, ApiError> {
    let CreateUser {
        username,
        email,
        password,
    } = input;
    let user = create_user(
        state.store.as_ref(),
        username.unwrap_or_default(),
        email.unwrap_or_default(),
        &password.unwrap_or_default(),
    )
    .await?;
    let token = JwtKeys::from_ref(&state).issue_token(user.id)?;

    info!(user_id = user.id, username = %user.username, "user registered");
    Ok(Json(UserResponse::new(user, Some(token))))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let email = payload.email.unwrap_or_default();
    let password = payload.password.unwrap_or_default();
    let user = authenticate(state.store.as_ref(), &email, &password).await?;
    let token = JwtKeys::from_ref(&state).issue_token(user.id)?;

    info!(user_id = user.id, "user logged in");
    Ok(Json(UserResponse::new(user, Some(token))))
}
