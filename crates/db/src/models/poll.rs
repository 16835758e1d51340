use chrono::{DateTime, Utc};
use diesel::{
    insert_into,
    prelude::*,
    result::Error::NotFound,
    sql_query,
    sql_types::{Bpchar, Integer},
};
use diesel_async::{pooled_connection::deadpool::Pool, AsyncPgConnection, RunQueryDsl};

use crate::{schema::polls, types::DbId};

/// A poll attached to a post. `options` and `option_counts` are
/// parallel arrays of the same length; the counts are only ever
/// touched through the single-statement index updates below, never by
/// rewriting the whole row.
#[derive(
    Queryable, Insertable, Identifiable, AsChangeset, Selectable, Debug, PartialEq, Clone, Eq,
)]
#[diesel(table_name = polls)]
pub struct Poll {
    pub id: DbId,
    pub post_id: DbId,
    pub options: Vec<String>,
    pub option_counts: Vec<i32>,
    pub ends_at: DateTime<Utc>,
    pub multiple_choice: bool,
    pub published: DateTime<Utc>,
}

impl Poll {
    /// Inserts the poll on an existing connection so the caller can
    /// wrap it in the same transaction as the owning post.
    pub async fn create(
        post_id: &DbId,
        options: Vec<String>,
        ends_at: DateTime<Utc>,
        multiple_choice: bool,
        conn: &mut AsyncPgConnection,
    ) -> anyhow::Result<Self> {
        let poll = Poll {
            id: DbId::default(),
            post_id: post_id.clone(),
            option_counts: vec![0; options.len()],
            options,
            ends_at,
            multiple_choice,
            published: Utc::now(),
        };

        insert_into(polls::table)
            .values(vec![poll.clone()])
            .execute(conn)
            .await?;

        Ok(poll)
    }

    pub async fn by_post_id(
        post_id: &DbId,
        db_pool: &Pool<AsyncPgConnection>,
    ) -> anyhow::Result<Option<Self>> {
        let poll = polls::table
            .filter(polls::post_id.eq(post_id))
            .first::<Self>(&mut db_pool.get().await?)
            .await;
        match poll {
            Ok(poll) => Ok(Some(poll)),
            Err(NotFound) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Whether the poll is closed at `now`. Closure is never stored;
    /// it is always recomputed from the end time.
    pub fn is_finished(&self, now: DateTime<Utc>) -> bool {
        now >= self.ends_at
    }

    /// Atomically bumps one option's count in a single UPDATE, so two
    /// concurrent voters on the same option cannot lose a vote to a
    /// read-then-write race. Returns false when no row was touched
    /// (poll gone or index out of range), which callers surface as a
    /// state conflict.
    pub async fn increment_option(
        poll_id: &DbId,
        index: usize,
        db_pool: &Pool<AsyncPgConnection>,
    ) -> anyhow::Result<bool> {
        // Postgres arrays are 1-based.
        let rows_affected = sql_query(
            "UPDATE polls SET option_counts[$2] = option_counts[$2] + 1 \
             WHERE id = $1 AND $2 BETWEEN 1 AND coalesce(array_length(option_counts, 1), 0)",
        )
        .bind::<Bpchar, _>(poll_id.to_string())
        .bind::<Integer, _>(index as i32 + 1)
        .execute(&mut db_pool.get().await?)
        .await?;

        Ok(rows_affected == 1)
    }

    /// Counterpart of `increment_option`, guarded so a count can never
    /// go below zero.
    pub async fn decrement_option(
        poll_id: &DbId,
        index: usize,
        db_pool: &Pool<AsyncPgConnection>,
    ) -> anyhow::Result<bool> {
        let rows_affected = sql_query(
            "UPDATE polls SET option_counts[$2] = option_counts[$2] - 1 \
             WHERE id = $1 AND $2 BETWEEN 1 AND coalesce(array_length(option_counts, 1), 0) \
             AND option_counts[$2] >= 1",
        )
        .bind::<Bpchar, _>(poll_id.to_string())
        .bind::<Integer, _>(index as i32 + 1)
        .execute(&mut db_pool.get().await?)
        .await?;

        Ok(rows_affected == 1)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::Poll;
    use crate::types::DbId;

    fn poll(ends_in: Duration) -> Poll {
        Poll {
            id: DbId::default(),
            post_id: DbId::default(),
            options: vec![String::from("A"), String::from("B")],
            option_counts: vec![0, 0],
            ends_at: Utc::now() + ends_in,
            multiple_choice: false,
            published: Utc::now(),
        }
    }

    #[test]
    fn finished_is_computed_from_end_time() {
        let now = Utc::now();
        assert!(!poll(Duration::hours(1)).is_finished(now));
        assert!(poll(Duration::hours(-1)).is_finished(now));

        let boundary = poll(Duration::zero());
        assert!(boundary.is_finished(boundary.ends_at));
    }
}
