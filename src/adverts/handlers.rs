use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    adverts::{
        repo_types::Advertisement,
        schema::{CreateAdvertisement, UpdateAdvertisement},
    },
    auth::{extractors::AuthUser, services::check_ownership},
    error::{ApiError, StatusResponse},
    extract::{ApiJson, ResourceId},
    state::AppState,
};

pub fn advertisement_routes() -> Router<AppState> {
    Router::new()
        .route("/adv/", post(create_advertisement))
        .route(
            "/adv/:id",
            get(get_advertisement)
                .patch(update_advertisement)
                .delete(delete_advertisement),
        )
}

async fn find_advertisement(state: &AppState, id: i64) -> Result<Advertisement, ApiError> {
    state
        .store
        .advertisement_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Advertisement doesn't exist".into()))
}

#[instrument(skip(state))]
pub async fn get_advertisement(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
    ResourceId(id): ResourceId,
) -> Result<Json<Advertisement>, ApiError> {
    Ok(Json(find_advertisement(&state, id).await?))
}

#[instrument(skip(state, input))]
pub async fn create_advertisement(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ApiJson(input): ApiJson<CreateAdvertisement>,
) -> Result<Json<Advertisement>, ApiError> {
    let adv = state.store.insert_advertisement(input.owned_by(caller)).await?;

    info!(adv_id = adv.id, user_id = caller, "advertisement created");
    Ok(Json(adv))
}

/// Applies every supplied field, then writes once.
#[instrument(skip(state, update))]
pub async fn update_advertisement(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ResourceId(id): ResourceId,
    ApiJson(update): ApiJson<UpdateAdvertisement>,
) -> Result<Json<Advertisement>, ApiError> {
    let adv = find_advertisement(&state, id).await?;
    check_ownership(adv.user_id, caller, "advertisement")?;

    let adv = state.store.update_advertisement(id, update.into()).await?;

    info!(adv_id = adv.id, user_id = caller, "advertisement updated");
    Ok(Json(adv))
}

#[instrument(skip(state))]
pub async fn delete_advertisement(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    ResourceId(id): ResourceId,
) -> Result<Json<StatusResponse>, ApiError> {
    let adv = find_advertisement(&state, id).await?;
    check_ownership(adv.user_id, caller, "advertisement")?;
    state.store.delete_advertisement(id).await?;

    info!(adv_id = id, user_id = caller, "advertisement deleted");
    Ok(Json(StatusResponse::success()))
}
