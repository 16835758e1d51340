use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use db::types::DbId;
use serde::Deserialize;
use serde_json::json;
use web::{errors::AppError, AppState};

use crate::{
    common::polls::{self, NewPoll, PollError},
    error::ApiError,
    identity::Identity,
};

#[derive(Deserialize)]
pub struct CreatePollBody {
    pub title: String,
    pub content: String,
    pub category: String,
    pub options: Vec<String>,
    pub ends_at: DateTime<Utc>,
    pub multiple_choice: bool,
}

#[derive(Deserialize)]
pub struct VoteBody {
    pub selected: Vec<i32>,
}

pub async fn http_post_create(
    state: State<Arc<AppState>>,
    identity: Identity,
    Json(body): Json<CreatePollBody>,
) -> Result<impl IntoResponse, AppError> {
    let created = polls::create_poll(
        NewPoll {
            author: identity.0,
            title: body.title,
            content: body.content,
            category: body.category,
            options: body.options,
            ends_at: body.ends_at,
            multiple_choice: body.multiple_choice,
        },
        &state,
    )
    .await;

    match created {
        Ok((post, _poll)) => Ok((
            StatusCode::CREATED,
            Json(json!({ "post_id": post.id.to_string() })),
        )
            .into_response()),
        Err(err) => poll_error_response(err),
    }
}

pub async fn http_get_info(
    state: State<Arc<AppState>>,
    Path(post_id): Path<String>,
    identity: Option<Identity>,
) -> Result<impl IntoResponse, AppError> {
    let post_id = DbId::from(post_id);
    let user_id = identity.as_ref().map(|identity| &identity.0);

    match polls::poll_info(&post_id, user_id, &state).await {
        Ok(info) => Ok(Json(info).into_response()),
        Err(err) => poll_error_response(err),
    }
}

pub async fn http_put_vote(
    state: State<Arc<AppState>>,
    Path(post_id): Path<String>,
    identity: Identity,
    Json(body): Json<VoteBody>,
) -> Result<impl IntoResponse, AppError> {
    let post_id = DbId::from(post_id);

    match polls::vote(&post_id, &identity.0, &body.selected, &state).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT.into_response()),
        Err(err) => poll_error_response(err),
    }
}

pub async fn http_delete_vote(
    state: State<Arc<AppState>>,
    Path(post_id): Path<String>,
    identity: Identity,
) -> Result<impl IntoResponse, AppError> {
    let post_id = DbId::from(post_id);

    match polls::delete_vote(&post_id, &identity.0, &state).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT.into_response()),
        Err(err) => poll_error_response(err),
    }
}

/// Validation and conflict outcomes become coded client errors;
/// anything internal goes through the 500 bridge.
fn poll_error_response(err: PollError) -> Result<Response, AppError> {
    let description = err.to_string();
    let (code, status) = match err {
        PollError::Internal(err) => return Err(err.into()),
        PollError::NotFound => ("POLL_NOT_FOUND", StatusCode::NOT_FOUND),
        PollError::Finished => ("POLL_FINISHED", StatusCode::CONFLICT),
        PollError::Duplicated => ("POLL_DUPLICATED", StatusCode::CONFLICT),
        PollError::MultipleChoiceNotAllowed => (
            "MULTIPLE_CHOICE_NOT_ALLOWED",
            StatusCode::UNPROCESSABLE_ENTITY,
        ),
        PollError::InvalidOption => ("INVALID_OPTION", StatusCode::UNPROCESSABLE_ENTITY),
        PollError::VoteNotFound => ("POLL_VOTE_USER_NOT_FOUND", StatusCode::NOT_FOUND),
        PollError::StateConflict => ("POLL_VOTE_STATE_CONFLICT", StatusCode::CONFLICT),
    };

    Ok(ApiError::new_with_description(code, &description, status).into_response())
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use axum::http::StatusCode;

    use super::poll_error_response;
    use crate::common::polls::PollError;

    #[test]
    fn conflicts_map_to_coded_client_errors() {
        let response = poll_error_response(PollError::Duplicated).ok().unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = poll_error_response(PollError::InvalidOption).ok().unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let response = poll_error_response(PollError::NotFound).ok().unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn internal_errors_escape_to_the_500_bridge() {
        assert!(poll_error_response(PollError::Internal(anyhow!("pool exhausted"))).is_err());
    }
}

pub fn polls() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/polls", post(http_post_create))
        .route("/api/v1/polls/:post_id", get(http_get_info))
        .route(
            "/api/v1/polls/:post_id/vote",
            put(http_put_vote).delete(http_delete_vote),
        )
}
