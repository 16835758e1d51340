//! The poll voting engine. All validation happens strictly before any
//! write; tally mutation goes through single-statement array-index
//! updates so concurrent ballots on the same option cannot lose votes
//! to a read-then-write race.

use chrono::{DateTime, Utc};
use db::{
    models::{Poll, PollVote, Post},
    schema::posts,
    types::DbId,
};
use diesel::insert_into;
use diesel_async::{AsyncConnection, RunQueryDsl};
use scoped_futures::ScopedFutureExt;
use thiserror::Error;
use web::AppState;

use crate::entities::PollInfo;

#[derive(Error, Debug)]
pub enum PollError {
    #[error("poll not found")]
    NotFound,
    #[error("poll already finished")]
    Finished,
    #[error("user already voted on this poll")]
    Duplicated,
    #[error("poll does not allow multiple selections")]
    MultipleChoiceNotAllowed,
    #[error("selected option out of range")]
    InvalidOption,
    #[error("no vote to withdraw")]
    VoteNotFound,
    #[error("poll changed concurrently, retry the operation")]
    StateConflict,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub struct NewPoll {
    pub author: DbId,
    pub title: String,
    pub content: String,
    pub category: String,
    pub options: Vec<String>,
    pub ends_at: DateTime<Utc>,
    pub multiple_choice: bool,
}

/// Creates the owning post and its poll as one transaction; neither is
/// visible unless both inserts succeed. Counts start at zero.
pub async fn create_poll(new_poll: NewPoll, state: &AppState) -> Result<(Post, Poll), PollError> {
    if new_poll.options.len() < 2 {
        return Err(PollError::InvalidOption);
    }

    let post = Post {
        id: DbId::default(),
        author: new_poll.author,
        title: new_poll.title,
        content: new_poll.content,
        category: new_poll.category,
        published: Utc::now(),
        deleted_at: None,
    };

    let mut conn = state.db_pool.get().await.map_err(anyhow::Error::from)?;
    let created = conn
        .transaction::<(Post, Poll), anyhow::Error, _>(|conn| {
            let post = post.clone();
            let options = new_poll.options.clone();
            async move {
                insert_into(posts::table)
                    .values(vec![post.clone()])
                    .execute(conn)
                    .await?;

                let poll = Poll::create(
                    &post.id,
                    options,
                    new_poll.ends_at,
                    new_poll.multiple_choice,
                    conn,
                )
                .await?;

                Ok((post, poll))
            }
            .scope_boxed()
        })
        .await?;

    Ok(created)
}

/// Casts the user's ballot. Validation order: poll found, still open,
/// no prior ballot, choice arity, index bounds; only then does
/// anything persist.
pub async fn vote(
    post_id: &DbId,
    user_id: &DbId,
    selected: &[i32],
    state: &AppState,
) -> Result<(), PollError> {
    let poll = Poll::by_post_id(post_id, &state.db_pool)
        .await?
        .ok_or(PollError::NotFound)?;

    if poll.is_finished(Utc::now()) {
        return Err(PollError::Finished);
    }

    if PollVote::by_poll_and_user(&poll.id, user_id, &state.db_pool)
        .await?
        .is_some()
    {
        return Err(PollError::Duplicated);
    }

    validate_selection(poll.multiple_choice, poll.options.len(), selected)?;

    // The unique index backstops the check above: a concurrent first
    // ballot from the same user makes this insert affect zero rows.
    if !PollVote::create(&poll.id, user_id, selected.to_vec(), &state.db_pool).await? {
        return Err(PollError::Duplicated);
    }

    for &index in selected {
        if !Poll::increment_option(&poll.id, index as usize, &state.db_pool).await? {
            return Err(PollError::StateConflict);
        }
    }

    Ok(())
}

/// Withdraws the user's ballot, decrementing each previously selected
/// option. The decrement only applies while the stored count is at
/// least one, so tallies cannot go negative.
pub async fn delete_vote(post_id: &DbId, user_id: &DbId, state: &AppState) -> Result<(), PollError> {
    let poll = Poll::by_post_id(post_id, &state.db_pool)
        .await?
        .ok_or(PollError::NotFound)?;

    let vote = PollVote::by_poll_and_user(&poll.id, user_id, &state.db_pool)
        .await?
        .ok_or(PollError::VoteNotFound)?;

    for &index in &vote.selected {
        if !Poll::decrement_option(&poll.id, index as usize, &state.db_pool).await? {
            return Err(PollError::StateConflict);
        }
    }

    vote.delete(&state.db_pool).await?;

    Ok(())
}

/// Pure read of a poll's current state, including the caller's ballot
/// when a user is known.
pub async fn poll_info(
    post_id: &DbId,
    user_id: Option<&DbId>,
    state: &AppState,
) -> Result<PollInfo, PollError> {
    let poll = Poll::by_post_id(post_id, &state.db_pool)
        .await?
        .ok_or(PollError::NotFound)?;

    Ok(PollInfo::build(poll, user_id, state).await?)
}

fn validate_selection(
    multiple_choice: bool,
    option_count: usize,
    selected: &[i32],
) -> Result<(), PollError> {
    if selected.is_empty() {
        return Err(PollError::InvalidOption);
    }

    if !multiple_choice && selected.len() > 1 {
        return Err(PollError::MultipleChoiceNotAllowed);
    }

    for (position, &index) in selected.iter().enumerate() {
        if index < 0 || index as usize >= option_count {
            return Err(PollError::InvalidOption);
        }
        // The same option twice on one ballot would double-count it.
        if selected[..position].contains(&index) {
            return Err(PollError::InvalidOption);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{validate_selection, PollError};

    #[test]
    fn single_choice_rejects_multiple_selections() {
        assert!(matches!(
            validate_selection(false, 2, &[0, 1]),
            Err(PollError::MultipleChoiceNotAllowed)
        ));
        assert!(validate_selection(false, 2, &[1]).is_ok());
    }

    #[test]
    fn multiple_choice_allows_several_distinct_options() {
        assert!(validate_selection(true, 3, &[0, 2]).is_ok());
        assert!(matches!(
            validate_selection(true, 3, &[0, 0]),
            Err(PollError::InvalidOption)
        ));
    }

    #[test]
    fn out_of_range_and_empty_selections_are_invalid() {
        assert!(matches!(
            validate_selection(false, 2, &[2]),
            Err(PollError::InvalidOption)
        ));
        assert!(matches!(
            validate_selection(false, 2, &[-1]),
            Err(PollError::InvalidOption)
        ));
        assert!(matches!(
            validate_selection(true, 2, &[]),
            Err(PollError::InvalidOption)
        ));
    }
}
