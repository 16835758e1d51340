//! Thin accessor over the Redis cache. No business logic lives here;
//! the engines decide what a miss or an unavailable cache means.
//!
//! Every operation is bounded by a short timeout. Callers treat any
//! `Err` as "cache unavailable" and fall back to Postgres, so a slow
//! or dead Redis degrades reads instead of blocking them.

use std::time::Duration;

use anyhow::anyhow;
use lazy_static::lazy_static;
use redis::{aio::ConnectionManager, AsyncCommands};

use crate::types::{DbId, DbLikeTarget};

lazy_static! {
    // Server-side check-then-decrement in one step, so a counter that
    // expires between the check and the write is never recreated at a
    // negative value.
    static ref DECR_IF_PRESENT: redis::Script = redis::Script::new(
        "if redis.call('EXISTS', KEYS[1]) == 1 then \
           return redis.call('DECRBY', KEYS[1], ARGV[1]) \
         else \
           return 0 \
         end",
    );
}

/// Sorted set holding the live trending score per post.
pub const TRENDING_KEY: &str = "posts:trending";

/// Key of the cached like counter for one target, e.g. `post:likes:2bY...`.
pub fn like_counter_key(target: DbLikeTarget, target_id: &DbId) -> String {
    format!("{}:likes:{}", target.cache_segment(), target_id)
}

#[derive(Clone)]
pub struct Cache {
    redis: ConnectionManager,
    op_timeout: Duration,
}

impl Cache {
    pub fn new(redis: ConnectionManager, op_timeout: Duration) -> Self {
        Cache { redis, op_timeout }
    }

    pub async fn counter(&self, key: &str) -> anyhow::Result<Option<i64>> {
        let mut redis = self.redis.clone();
        self.bounded(async move { redis.get(key).await }).await
    }

    pub async fn set_counter(&self, key: &str, value: i64, ttl: i64) -> anyhow::Result<()> {
        let mut redis = self.redis.clone();
        self.bounded(async move { redis.set_ex(key, value, ttl as u64).await })
            .await
    }

    /// Atomic INCRBY; a key created by this call starts at `delta` and
    /// gets the counter TTL attached.
    pub async fn incr_counter(&self, key: &str, delta: i64, ttl: i64) -> anyhow::Result<i64> {
        let mut redis = self.redis.clone();
        let key = key.to_string();
        self.bounded(async move {
            let value: i64 = redis.incr(&key, delta).await?;
            if value == delta {
                let _: () = redis.expire(&key, ttl).await?;
            }
            Ok(value)
        })
        .await
    }

    /// DECRBY guarded by a same-step existence check, so the write is
    /// skipped when the counter is absent. The next cold read
    /// repopulates it from Postgres.
    pub async fn decr_counter_if_present(&self, key: &str, delta: i64) -> anyhow::Result<()> {
        let mut redis = self.redis.clone();
        let key = key.to_string();
        self.bounded(async move {
            let _: i64 = DECR_IF_PRESENT
                .key(&key)
                .arg(delta)
                .invoke_async(&mut redis)
                .await?;
            Ok(())
        })
        .await
    }

    pub async fn refresh_ttl(&self, key: &str, ttl: i64) -> anyhow::Result<()> {
        let mut redis = self.redis.clone();
        self.bounded(async move { redis.expire(key, ttl).await })
            .await
    }

    /// ZINCRBY on the trending set; returns the member's new score.
    pub async fn bump_score(&self, post_id: &DbId, delta: f64) -> anyhow::Result<f64> {
        let mut redis = self.redis.clone();
        let member = post_id.to_string();
        self.bounded(async move { redis.zincr(TRENDING_KEY, member, delta).await })
            .await
    }

    /// Top `n` members of the trending set, highest score first.
    pub async fn top_scores(&self, n: isize) -> anyhow::Result<Vec<String>> {
        let stop = match top_range_stop(n) {
            Some(stop) => stop,
            None => return Ok(Vec::new()),
        };

        let mut redis = self.redis.clone();
        self.bounded(async move { redis.zrevrange(TRENDING_KEY, 0, stop).await })
            .await
    }

    pub async fn remove_score(&self, post_id: &DbId) -> anyhow::Result<()> {
        let mut redis = self.redis.clone();
        let member = post_id.to_string();
        self.bounded(async move { redis.zrem(TRENDING_KEY, member).await })
            .await
    }

    async fn bounded<T>(
        &self,
        op: impl std::future::Future<Output = redis::RedisResult<T>>,
    ) -> anyhow::Result<T> {
        match tokio::time::timeout(self.op_timeout, op).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(anyhow!("cache operation timed out")),
        }
    }
}

/// ZREVRANGE reads a negative stop as "from the end of the set", so
/// asking for zero or fewer members must short-circuit instead of
/// fetching the whole set.
fn top_range_stop(n: isize) -> Option<isize> {
    if n < 1 {
        None
    } else {
        Some(n - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::{like_counter_key, top_range_stop};
    use crate::types::{DbId, DbLikeTarget};

    #[test]
    fn counter_keys_are_namespaced_by_target() {
        let id = DbId::from(String::from("2bYqx17GdQqGrFnAhrJ6dQkmcFA"));
        assert_eq!(
            like_counter_key(DbLikeTarget::Post, &id),
            "post:likes:2bYqx17GdQqGrFnAhrJ6dQkmcFA"
        );
        assert_eq!(
            like_counter_key(DbLikeTarget::Reply, &id),
            "reply:likes:2bYqx17GdQqGrFnAhrJ6dQkmcFA"
        );
    }

    #[test]
    fn non_positive_ranking_sizes_fetch_nothing() {
        assert_eq!(top_range_stop(0), None);
        assert_eq!(top_range_stop(-5), None);
        assert_eq!(top_range_stop(1), Some(0));
        assert_eq!(top_range_stop(10), Some(9));
    }
}
