use chrono::{DateTime, Utc};
use diesel::{insert_into, prelude::*, result::Error::NotFound, update};
use diesel_async::{pooled_connection::deadpool::Pool, AsyncPgConnection, RunQueryDsl};

use crate::{
    schema::likes,
    types::{DbId, DbLikeTarget},
};

/// One user's like on one target. Unliking soft-deletes the row so a
/// later re-like revives it instead of inserting a duplicate; the
/// (target_type, target_id, user_id) key holds at most one row either
/// way.
#[derive(Queryable, Insertable, AsChangeset, Selectable, Debug, PartialEq, Clone, Eq)]
#[diesel(table_name = likes)]
pub struct Like {
    pub target_type: DbLikeTarget,
    pub target_id: DbId,
    pub user_id: DbId,
    pub published: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Like {
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }

    pub async fn create(
        target_type: DbLikeTarget,
        target_id: &DbId,
        user_id: &DbId,
        db_pool: &Pool<AsyncPgConnection>,
    ) -> anyhow::Result<bool> {
        let rows_affected = insert_into(likes::table)
            .values(vec![Like {
                target_type,
                target_id: target_id.clone(),
                user_id: user_id.clone(),
                published: Utc::now(),
                deleted_at: None,
            }])
            .on_conflict((likes::target_type, likes::target_id, likes::user_id))
            .do_nothing()
            .execute(&mut db_pool.get().await?)
            .await
            .optional()?;

        Ok(rows_affected == Some(1))
    }

    pub async fn by_target_and_user(
        target_type: DbLikeTarget,
        target_id: &DbId,
        user_id: &DbId,
        db_pool: &Pool<AsyncPgConnection>,
    ) -> anyhow::Result<Option<Self>> {
        let like = likes::table
            .filter(likes::target_type.eq(target_type))
            .filter(likes::target_id.eq(target_id))
            .filter(likes::user_id.eq(user_id))
            .first::<Self>(&mut db_pool.get().await?)
            .await;
        match like {
            Ok(like) => Ok(Some(like)),
            Err(NotFound) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn soft_delete(&self, db_pool: &Pool<AsyncPgConnection>) -> anyhow::Result<()> {
        update(
            likes::table
                .filter(likes::target_type.eq(self.target_type))
                .filter(likes::target_id.eq(self.target_id.clone()))
                .filter(likes::user_id.eq(self.user_id.clone())),
        )
        .set(likes::deleted_at.eq(Some(Utc::now())))
        .execute(&mut db_pool.get().await?)
        .await?;

        Ok(())
    }

    /// Clears the delete marker and refreshes the timestamp.
    pub async fn restore(&self, db_pool: &Pool<AsyncPgConnection>) -> anyhow::Result<()> {
        update(
            likes::table
                .filter(likes::target_type.eq(self.target_type))
                .filter(likes::target_id.eq(self.target_id.clone()))
                .filter(likes::user_id.eq(self.user_id.clone())),
        )
        .set((
            likes::deleted_at.eq(None::<DateTime<Utc>>),
            likes::published.eq(Utc::now()),
        ))
        .execute(&mut db_pool.get().await?)
        .await?;

        Ok(())
    }

    /// Authoritative count of active likes, straight from Postgres.
    pub async fn count_active(
        target_type: DbLikeTarget,
        target_id: &DbId,
        db_pool: &Pool<AsyncPgConnection>,
    ) -> anyhow::Result<i64> {
        let count = likes::table
            .filter(likes::target_type.eq(target_type))
            .filter(likes::target_id.eq(target_id))
            .filter(likes::deleted_at.is_null())
            .count()
            .get_result::<i64>(&mut db_pool.get().await?)
            .await?;

        Ok(count)
    }

    pub async fn is_liked(
        target_type: DbLikeTarget,
        target_id: &DbId,
        user_id: &DbId,
        db_pool: &Pool<AsyncPgConnection>,
    ) -> anyhow::Result<bool> {
        Ok(Self::by_target_and_user(target_type, target_id, user_id, db_pool)
            .await?
            .map(|like| like.is_active())
            .unwrap_or(false))
    }

    /// Ids of every target of one type the user currently likes,
    /// newest like first.
    pub async fn liked_target_ids(
        target_type: DbLikeTarget,
        user_id: &DbId,
        db_pool: &Pool<AsyncPgConnection>,
    ) -> anyhow::Result<Vec<DbId>> {
        let ids = likes::table
            .filter(likes::target_type.eq(target_type))
            .filter(likes::user_id.eq(user_id))
            .filter(likes::deleted_at.is_null())
            .order(likes::published.desc())
            .select(likes::target_id)
            .load::<DbId>(&mut db_pool.get().await?)
            .await?;

        Ok(ids)
    }
}
