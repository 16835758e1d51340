use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use db::pagination::PageQuery;
use serde::Deserialize;
use web::{errors::AppError, AppState};

use crate::{common::ranking, entities::RankedPost};

#[derive(Deserialize)]
pub struct TrendingQuery {
    pub limit: Option<i64>,
}

pub async fn http_get_trending(
    state: State<Arc<AppState>>,
    Query(query): Query<TrendingQuery>,
) -> Result<impl IntoResponse, AppError> {
    let limit = match query.limit {
        None => 10,
        Some(limit) if limit < 1 => 10,
        Some(limit) if limit < 40 => limit,
        _ => 40,
    };

    let posts = ranking::top_posts(limit, &state).await?;

    Ok(Json(RankedPost::build_from_vec(posts, &state).await?))
}

pub async fn http_get_best(
    state: State<Arc<AppState>>,
    Query(pagination): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let posts = ranking::best_page(pagination.into(), &state).await?;

    Ok(Json(RankedPost::build_from_vec(posts, &state).await?))
}

pub fn posts() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/posts/trending", get(http_get_trending))
        .route("/api/v1/posts/best", get(http_get_best))
}
