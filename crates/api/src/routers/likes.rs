use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use db::types::{DbId, DbLikeTarget};
use web::{errors::AppError, AppState};

use crate::{
    common::likes,
    entities::{LikeState, LikeToggle},
    error::ApiError,
    identity::Identity,
};

pub async fn http_post_toggle(
    state: State<Arc<AppState>>,
    Path((target_type, id)): Path<(String, String)>,
    identity: Identity,
) -> Result<impl IntoResponse, AppError> {
    let target_type = match DbLikeTarget::from_string(&target_type) {
        Some(target_type) => target_type,
        None => {
            return Ok(
                ApiError::new("Unknown like target", StatusCode::NOT_FOUND).into_response()
            )
        }
    };
    let id = DbId::from(id);

    match likes::toggle_like(target_type, &id, &identity.0, &state).await? {
        Some(outcome) => Ok(Json(LikeToggle { outcome }).into_response()),
        None => Ok(ApiError::new("Record not found", StatusCode::NOT_FOUND).into_response()),
    }
}

pub async fn http_get_state(
    state: State<Arc<AppState>>,
    Path((target_type, id)): Path<(String, String)>,
    identity: Option<Identity>,
) -> Result<impl IntoResponse, AppError> {
    let target_type = match DbLikeTarget::from_string(&target_type) {
        Some(target_type) => target_type,
        None => {
            return Ok(
                ApiError::new("Unknown like target", StatusCode::NOT_FOUND).into_response()
            )
        }
    };
    let id = DbId::from(id);

    let likes = likes::like_count(target_type, &id, &state).await?;
    let liked = match &identity {
        Some(identity) => Some(likes::is_liked(target_type, &id, &identity.0, &state).await?),
        None => None,
    };

    Ok(Json(LikeState { likes, liked }).into_response())
}

pub async fn http_get_liked(
    state: State<Arc<AppState>>,
    Path(target_type): Path<String>,
    identity: Identity,
) -> Result<impl IntoResponse, AppError> {
    let target_type = match DbLikeTarget::from_string(&target_type) {
        Some(target_type) => target_type,
        None => {
            return Ok(
                ApiError::new("Unknown like target", StatusCode::NOT_FOUND).into_response()
            )
        }
    };

    let ids: Vec<String> = likes::liked_target_ids(target_type, &identity.0, &state)
        .await?
        .into_iter()
        .map(|id| id.to_string())
        .collect();

    Ok(Json(ids).into_response())
}

pub fn likes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/likes/:target_type", get(http_get_liked))
        .route(
            "/api/v1/likes/:target_type/:id",
            post(http_post_toggle).get(http_get_state),
        )
}
