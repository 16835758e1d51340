//! Comment and reply rows. Their CRUD lives elsewhere; the like engine
//! only needs existence checks against them.

use chrono::{DateTime, Utc};
use diesel::{prelude::*, result::Error::NotFound};
use diesel_async::{pooled_connection::deadpool::Pool, AsyncPgConnection, RunQueryDsl};

use crate::{
    schema::{comments, replies},
    types::DbId,
};

#[derive(
    Queryable, Insertable, Identifiable, AsChangeset, Selectable, Debug, PartialEq, Clone, Eq,
)]
#[diesel(table_name = comments)]
pub struct Comment {
    pub id: DbId,
    pub post_id: DbId,
    pub author: DbId,
    pub content: String,
    pub published: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Comment {
    pub async fn active_by_id(
        id: &DbId,
        db_pool: &Pool<AsyncPgConnection>,
    ) -> anyhow::Result<Option<Self>> {
        let comment = comments::table
            .filter(comments::id.eq(id))
            .filter(comments::deleted_at.is_null())
            .first::<Self>(&mut db_pool.get().await?)
            .await;
        match comment {
            Ok(comment) => Ok(Some(comment)),
            Err(NotFound) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

#[derive(
    Queryable, Insertable, Identifiable, AsChangeset, Selectable, Debug, PartialEq, Clone, Eq,
)]
#[diesel(table_name = replies)]
pub struct Reply {
    pub id: DbId,
    pub comment_id: DbId,
    pub author: DbId,
    pub content: String,
    pub published: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Reply {
    pub async fn active_by_id(
        id: &DbId,
        db_pool: &Pool<AsyncPgConnection>,
    ) -> anyhow::Result<Option<Self>> {
        let reply = replies::table
            .filter(replies::id.eq(id))
            .filter(replies::deleted_at.is_null())
            .first::<Self>(&mut db_pool.get().await?)
            .await;
        match reply {
            Ok(reply) => Ok(Some(reply)),
            Err(NotFound) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}
