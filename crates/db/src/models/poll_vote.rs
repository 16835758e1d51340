use chrono::{DateTime, Utc};
use diesel::{delete, insert_into, prelude::*, result::Error::NotFound};
use diesel_async::{pooled_connection::deadpool::Pool, AsyncPgConnection, RunQueryDsl};

use crate::{schema::poll_votes, types::DbId};

/// One user's ballot on one poll; the (poll_id, user_id) unique index
/// is the hard guarantee against double voting.
#[derive(
    Queryable, Insertable, Identifiable, AsChangeset, Selectable, Debug, PartialEq, Clone, Eq,
)]
#[diesel(table_name = poll_votes)]
pub struct PollVote {
    pub id: DbId,
    pub poll_id: DbId,
    pub user_id: DbId,
    pub selected: Vec<i32>,
    pub published: DateTime<Utc>,
}

impl PollVote {
    /// Returns false when the user already has a ballot on this poll,
    /// including one inserted by a concurrent request.
    pub async fn create(
        poll_id: &DbId,
        user_id: &DbId,
        selected: Vec<i32>,
        db_pool: &Pool<AsyncPgConnection>,
    ) -> anyhow::Result<bool> {
        let rows_affected = insert_into(poll_votes::table)
            .values(vec![PollVote {
                id: DbId::default(),
                poll_id: poll_id.clone(),
                user_id: user_id.clone(),
                selected,
                published: Utc::now(),
            }])
            .on_conflict((poll_votes::poll_id, poll_votes::user_id))
            .do_nothing()
            .execute(&mut db_pool.get().await?)
            .await
            .optional()?;

        Ok(rows_affected == Some(1))
    }

    pub async fn by_poll_and_user(
        poll_id: &DbId,
        user_id: &DbId,
        db_pool: &Pool<AsyncPgConnection>,
    ) -> anyhow::Result<Option<Self>> {
        let vote = poll_votes::table
            .filter(poll_votes::poll_id.eq(poll_id))
            .filter(poll_votes::user_id.eq(user_id))
            .first::<Self>(&mut db_pool.get().await?)
            .await;
        match vote {
            Ok(vote) => Ok(Some(vote)),
            Err(NotFound) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn delete(&self, db_pool: &Pool<AsyncPgConnection>) -> anyhow::Result<()> {
        delete(poll_votes::table.filter(poll_votes::id.eq(self.id.clone())))
            .execute(&mut db_pool.get().await?)
            .await?;

        Ok(())
    }

    /// Number of users who have voted on this poll.
    pub async fn count_for_poll(
        poll_id: &DbId,
        db_pool: &Pool<AsyncPgConnection>,
    ) -> anyhow::Result<i64> {
        let count = poll_votes::table
            .filter(poll_votes::poll_id.eq(poll_id))
            .count()
            .get_result::<i64>(&mut db_pool.get().await?)
            .await?;

        Ok(count)
    }
}
