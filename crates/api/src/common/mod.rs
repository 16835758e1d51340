pub mod likes;
pub mod polls;
pub mod ranking;

use std::time::Duration;

use db::cache::Cache;
use web::AppState;

/// Cache accessor bound to this deployment's operation timeout.
pub fn cache(state: &AppState) -> Cache {
    Cache::new(
        state.redis.clone(),
        Duration::from_millis(state.config.redis.op_timeout_ms),
    )
}
