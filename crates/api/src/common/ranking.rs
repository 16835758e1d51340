//! The ranking engine. The live trending score lives in a Redis
//! sorted set and is never persisted as-is; the `best_posts` table
//! remembers which posts have ever crossed the threshold. Every read
//! that resolves a ranked id verifies the post still exists and evicts
//! dangling entries, so the surface self-corrects instead of handing
//! out dead references.

use db::{
    models::{BestPost, Post},
    pagination::Page,
    types::DbId,
};
use web::{config::Ranking, AppState};

/// Whether likes on posts in this category feed the trending score.
/// An empty `trending_categories` list makes every category eligible.
pub fn feeds_trending(category: &str, config: &Ranking) -> bool {
    config.trending_categories.is_empty()
        || config.trending_categories.iter().any(|c| c == category)
}

/// Adjusts a post's trending score. Scores are a heuristic, not a
/// count; a member whose score drops to zero or below is evicted
/// rather than kept at a negative value. Returns the new score, or
/// `None` when the cache was unavailable.
pub async fn apply_score_delta(
    post_id: &DbId,
    delta: f64,
    state: &AppState,
) -> anyhow::Result<Option<f64>> {
    let cache = super::cache(state);

    let score = match cache.bump_score(post_id, delta).await {
        Ok(score) => score,
        Err(err) => {
            log::warn!("trending cache unavailable for {}: {:#}", post_id, err);
            return Ok(None);
        }
    };

    if score <= 0.0 {
        if let Err(err) = cache.remove_score(post_id).await {
            log::warn!("failed to evict drained trending entry {}: {:#}", post_id, err);
        }
        return Ok(Some(0.0));
    }

    Ok(Some(score))
}

/// Score update plus best-ledger materialization: once the new score
/// reaches the configured threshold the post earns a durable
/// `best_posts` entry, decoupling "currently trending" from "has ever
/// trended".
pub async fn bump_post(post_id: &DbId, delta: f64, state: &AppState) -> anyhow::Result<()> {
    let score = apply_score_delta(post_id, delta, state).await?;

    if let Some(score) = score {
        if score >= state.config.ranking.best_threshold {
            BestPost::create_if_absent(post_id, &state.db_pool).await?;
        }
    }

    Ok(())
}

/// Up to `n` currently-trending posts, best first. Ids whose post is
/// gone are dropped from the result and evicted from both stores. When
/// the cache is unavailable the freshest best-ledger entries stand in,
/// so the endpoint degrades instead of failing.
pub async fn top_posts(n: i64, state: &AppState) -> anyhow::Result<Vec<Post>> {
    if n < 1 {
        return Ok(Vec::new());
    }

    let cache = super::cache(state);

    let ids = match cache.top_scores(n as isize).await {
        Ok(ids) => ids,
        Err(err) => {
            log::warn!("trending cache unavailable, serving best ledger: {:#}", err);
            return best_page(Page { number: 0, size: n }, state).await;
        }
    };

    let mut posts = Vec::with_capacity(ids.len());
    for id in ids {
        let id = DbId::from(id);
        match Post::active_by_id(&id, &state.db_pool).await? {
            Some(post) => posts.push(post),
            None => evict(&id, state).await?,
        }
    }

    Ok(posts)
}

/// One page of the "has ever trended" archive, newest first, with the
/// same verify-or-evict treatment as the live ranking.
pub async fn best_page(page: Page, state: &AppState) -> anyhow::Result<Vec<Post>> {
    let entries = BestPost::page(page, &state.db_pool).await?;

    let mut posts = Vec::with_capacity(entries.len());
    for entry in entries {
        match Post::active_by_id(&entry.post_id, &state.db_pool).await? {
            Some(post) => posts.push(post),
            None => evict(&entry.post_id, state).await?,
        }
    }

    Ok(posts)
}

pub async fn delete_best_entry(post_id: &DbId, state: &AppState) -> anyhow::Result<()> {
    BestPost::delete(post_id, &state.db_pool).await
}

/// Removes a dangling post id from the ledger and the trending set.
async fn evict(post_id: &DbId, state: &AppState) -> anyhow::Result<()> {
    delete_best_entry(post_id, state).await?;

    if let Err(err) = super::cache(state).remove_score(post_id).await {
        log::warn!("failed to evict trending entry {}: {:#}", post_id, err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_category_feeds_trending_by_default() {
        let config = Ranking::default();

        assert!(feeds_trending("free", &config));
        assert!(feeds_trending("market", &config));
    }

    #[test]
    fn only_listed_categories_feed_trending() {
        let config = Ranking {
            trending_categories: vec!["free".to_string(), "secret".to_string()],
            ..Ranking::default()
        };

        assert!(feeds_trending("free", &config));
        assert!(!feeds_trending("market", &config));
    }
}
