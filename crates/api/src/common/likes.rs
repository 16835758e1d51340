//! The like engine. Postgres holds the ground truth (one active row
//! per (target, user)); the Redis counter is an accelerator that is
//! repaired opportunistically on every miss and never required for
//! correctness.

use db::{
    cache::{self, Cache},
    models::{Comment, Like, Post, Reply},
    types::{DbId, DbLikeTarget},
};
use serde::Serialize;
use web::AppState;

use crate::common::ranking;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ToggleOutcome {
    Added,
    Removed,
    Restored,
}

/// Flips the user's like on a target. `Ok(None)` means the target does
/// not exist (or is deleted) and nothing was written.
pub async fn toggle_like(
    target_type: DbLikeTarget,
    target_id: &DbId,
    user_id: &DbId,
    state: &AppState,
) -> anyhow::Result<Option<ToggleOutcome>> {
    // Posts keep the loaded row around so the ranking gate can read
    // its category; the other targets only need the existence check.
    let post = match target_type {
        DbLikeTarget::Post => match Post::active_by_id(target_id, &state.db_pool).await? {
            Some(post) => Some(post),
            None => return Ok(None),
        },
        _ => {
            if !target_exists(target_type, target_id, state).await? {
                return Ok(None);
            }
            None
        }
    };

    let cache = super::cache(state);
    let key = cache::like_counter_key(target_type, target_id);
    let ttl = state.config.redis.counter_ttl;

    let existing = Like::by_target_and_user(target_type, target_id, user_id, &state.db_pool).await?;
    let outcome = outcome_for(existing.as_ref());

    match (outcome, existing) {
        (ToggleOutcome::Added, _) => {
            // A concurrent first like from the same user loses the
            // insert race here; the winner already applied the counter
            // and ranking side effects once.
            if Like::create(target_type, target_id, user_id, &state.db_pool).await? {
                incr_counter(&cache, &key, ttl).await;
                if let Some(post) = &post {
                    if ranking::feeds_trending(&post.category, &state.config.ranking) {
                        ranking::bump_post(target_id, state.config.ranking.like_delta, state)
                            .await?;
                    }
                }
            }
        }
        (ToggleOutcome::Removed, Some(like)) => {
            like.soft_delete(&state.db_pool).await?;
            if let Err(err) = cache.decr_counter_if_present(&key, 1).await {
                log::warn!("failed to decrement like counter {}: {:#}", key, err);
            }
        }
        (ToggleOutcome::Restored, Some(like)) => {
            like.restore(&state.db_pool).await?;
            incr_counter(&cache, &key, ttl).await;
        }
        // outcome_for only yields Removed/Restored when a row exists
        (_, None) => unreachable!(),
    }

    Ok(Some(outcome))
}

/// What a toggle does, given the user's current record for the target:
/// no row adds a like, an active row removes it, a soft-deleted row
/// revives it.
fn outcome_for(existing: Option<&Like>) -> ToggleOutcome {
    match existing {
        None => ToggleOutcome::Added,
        Some(like) if like.is_active() => ToggleOutcome::Removed,
        Some(_) => ToggleOutcome::Restored,
    }
}

/// Cache-first like count. A hit refreshes the TTL; a miss (or an
/// unavailable cache) falls back to counting active rows, and the
/// cache is repopulated off the request path so the caller never waits
/// on the repair.
pub async fn like_count(
    target_type: DbLikeTarget,
    target_id: &DbId,
    state: &AppState,
) -> anyhow::Result<i64> {
    let cache = super::cache(state);
    let key = cache::like_counter_key(target_type, target_id);
    let ttl = state.config.redis.counter_ttl;

    match cache.counter(&key).await {
        Ok(Some(count)) => {
            if let Err(err) = cache.refresh_ttl(&key, ttl).await {
                log::warn!("failed to refresh like counter ttl {}: {:#}", key, err);
            }
            return Ok(count);
        }
        Ok(None) => {}
        Err(err) => log::warn!("like counter cache unavailable for {}: {:#}", key, err),
    }

    let count = Like::count_active(target_type, target_id, &state.db_pool).await?;

    tokio::spawn(async move {
        if let Err(err) = cache.set_counter(&key, count, ttl).await {
            log::warn!("failed to repopulate like counter {}: {:#}", key, err);
        }
    });

    Ok(count)
}

pub async fn is_liked(
    target_type: DbLikeTarget,
    target_id: &DbId,
    user_id: &DbId,
    state: &AppState,
) -> anyhow::Result<bool> {
    Like::is_liked(target_type, target_id, user_id, &state.db_pool).await
}

pub async fn liked_target_ids(
    target_type: DbLikeTarget,
    user_id: &DbId,
    state: &AppState,
) -> anyhow::Result<Vec<DbId>> {
    Like::liked_target_ids(target_type, user_id, &state.db_pool).await
}

/// Existence check through the owning model. External targets belong
/// to another service and are trusted as already validated.
async fn target_exists(
    target_type: DbLikeTarget,
    target_id: &DbId,
    state: &AppState,
) -> anyhow::Result<bool> {
    let exists = match target_type {
        DbLikeTarget::Post => Post::active_by_id(target_id, &state.db_pool).await?.is_some(),
        DbLikeTarget::Comment => Comment::active_by_id(target_id, &state.db_pool)
            .await?
            .is_some(),
        DbLikeTarget::Reply => Reply::active_by_id(target_id, &state.db_pool)
            .await?
            .is_some(),
        DbLikeTarget::External => true,
    };

    Ok(exists)
}

async fn incr_counter(cache: &Cache, key: &str, ttl: i64) {
    if let Err(err) = cache.incr_counter(key, 1, ttl).await {
        log::warn!("failed to increment like counter {}: {:#}", key, err);
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn like(deleted: bool) -> Like {
        Like {
            target_type: DbLikeTarget::Post,
            target_id: DbId::default(),
            user_id: DbId::default(),
            published: Utc::now(),
            deleted_at: deleted.then(Utc::now),
        }
    }

    #[test]
    fn first_like_is_added() {
        assert_eq!(outcome_for(None), ToggleOutcome::Added);
    }

    #[test]
    fn active_like_is_removed() {
        assert_eq!(outcome_for(Some(&like(false))), ToggleOutcome::Removed);
    }

    #[test]
    fn soft_deleted_like_is_restored() {
        assert_eq!(outcome_for(Some(&like(true))), ToggleOutcome::Restored);
    }
}
