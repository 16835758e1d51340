use chrono::{DateTime, Utc};
use diesel::{delete, insert_into, prelude::*};
use diesel_async::{pooled_connection::deadpool::Pool, AsyncPgConnection, RunQueryDsl};

use crate::{pagination::Page, schema::best_posts, types::DbId};

/// Durable ledger of posts that have ever crossed the trending
/// threshold, independent of the live score in the cache.
#[derive(Queryable, Insertable, AsChangeset, Selectable, Debug, PartialEq, Clone, Eq)]
#[diesel(table_name = best_posts)]
pub struct BestPost {
    pub post_id: DbId,
    pub published: DateTime<Utc>,
}

impl BestPost {
    /// Idempotent insert; returns true only when this call created the
    /// entry.
    pub async fn create_if_absent(
        post_id: &DbId,
        db_pool: &Pool<AsyncPgConnection>,
    ) -> anyhow::Result<bool> {
        let rows_affected = insert_into(best_posts::table)
            .values(vec![BestPost {
                post_id: post_id.clone(),
                published: Utc::now(),
            }])
            .on_conflict(best_posts::post_id)
            .do_nothing()
            .execute(&mut db_pool.get().await?)
            .await
            .optional()?;

        Ok(rows_affected == Some(1))
    }

    pub async fn delete(post_id: &DbId, db_pool: &Pool<AsyncPgConnection>) -> anyhow::Result<()> {
        delete(best_posts::table.filter(best_posts::post_id.eq(post_id)))
            .execute(&mut db_pool.get().await?)
            .await?;

        Ok(())
    }

    /// One page of the ledger, newest entry first.
    pub async fn page(
        page: Page,
        db_pool: &Pool<AsyncPgConnection>,
    ) -> anyhow::Result<Vec<Self>> {
        let entries = best_posts::table
            .order(best_posts::published.desc())
            .offset(page.offset())
            .limit(page.size)
            .load::<Self>(&mut db_pool.get().await?)
            .await?;

        Ok(entries)
    }
}
