pub mod likes;
pub mod polls;
pub mod posts;

use std::sync::Arc;

use axum::Router;
use web::AppState;

pub fn api() -> Router<Arc<AppState>> {
    Router::new()
        .merge(likes::likes())
        .merge(polls::polls())
        .merge(posts::posts())
}
