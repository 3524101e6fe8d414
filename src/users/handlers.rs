use axum::{
    extract::{FromRef, State},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::{
        extractors::AuthUser,
        jwt::JwtKeys,
        password::hash_password,
        services::{check_ownership, conflict_or},
    },
    error::{ApiError, StatusResponse},
    extract::{ApiJson, ResourceId},
    state::AppState,
    store::UserChanges,
    users::{dto::UserResponse, repo_types::User, schema::UpdateUser},
};

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/user/:id", get(get_user).patch(update_user).delete(delete_user))
}

async fn find_user(state: &AppState, id: i64) -> Result<User, ApiError> {
    state
        .store
        .user_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User doesn't exist".into()))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
    ResourceId(id): ResourceId,
) -> Result<Json<UserResponse>, ApiError> {
    let user = find_user(&state, id).await?;
    Ok(Json(UserResponse::new(user, None)))
}

#[instrument(skip(state, update))]
pub async fn update_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ResourceId(id): ResourceId,
    ApiJson(update): ApiJson<UpdateUser>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = find_user(&state, id).await?;
    check_ownership(user.id, caller, "user")?;

    let password_hash = update.password.as_deref().map(hash_password).transpose()?;
    let changes = UserChanges {
        username: update.username.clone(),
        email: update.email.clone(),
        password_hash,
    };
    let user = state
        .store
        .update_user(id, changes)
        .await
        .map_err(|e| conflict_or(e, update.username.as_deref(), update.email.as_deref()))?;
    let token = JwtKeys::from_ref(&state).issue_token(user.id)?;

    info!(user_id = user.id, "user updated");
    Ok(Json(UserResponse::new(user, Some(token))))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ResourceId(id): ResourceId,
) -> Result<Json<StatusResponse>, ApiError> {
    let user = find_user(&state, id).await?;
    check_ownership(user.id, caller, "user")?;
    state.store.delete_user(id).await?;

    info!(user_id = id, "user deleted");
    Ok(Json(StatusResponse::success()))
}
