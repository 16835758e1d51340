use chrono::{DateTime, Utc};
use db::{models::Post, types::DbLikeTarget};
use serde::Serialize;
use web::AppState;

use crate::common::likes;

/// A post as it appears in the trending / best listings, decorated
/// with its like count.
#[derive(Serialize, Debug)]
pub struct RankedPost {
    pub id: String,
    pub author: String,
    pub title: String,
    pub content: String,
    pub category: String,
    pub published: DateTime<Utc>,
    pub likes: i64,
}

impl RankedPost {
    pub async fn build(post: Post, state: &AppState) -> anyhow::Result<Self> {
        let likes = likes::like_count(DbLikeTarget::Post, &post.id, state).await?;

        Ok(RankedPost {
            id: post.id.to_string(),
            author: post.author.to_string(),
            title: post.title,
            content: post.content,
            category: post.category,
            published: post.published,
            likes,
        })
    }

    pub async fn build_from_vec(posts: Vec<Post>, state: &AppState) -> anyhow::Result<Vec<Self>> {
        let mut ranked = Vec::with_capacity(posts.len());
        for post in posts {
            ranked.push(Self::build(post, state).await?);
        }

        Ok(ranked)
    }
}
