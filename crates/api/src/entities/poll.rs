use chrono::{DateTime, Utc};
use db::{
    models::{Poll, PollVote},
    types::DbId,
};
use serde::Serialize;
use serde_with::skip_serializing_none;
use web::AppState;

/// Full poll state for one reader: the shared tallies plus the
/// caller's own ballot when a user is known. `is_finished` is computed
/// against the current clock, never stored.
#[derive(Serialize, Debug)]
#[skip_serializing_none]
pub struct PollInfo {
    pub options: Vec<String>,
    pub counts: Vec<i32>,
    pub ends_at: DateTime<Utc>,
    pub multiple_choice: bool,
    pub total_participants: i64,
    pub user_selections: Option<Vec<i32>>,
    pub has_voted: bool,
    pub is_finished: bool,
}

impl PollInfo {
    pub async fn build(
        poll: Poll,
        user_id: Option<&DbId>,
        state: &AppState,
    ) -> anyhow::Result<Self> {
        let total_participants = PollVote::count_for_poll(&poll.id, &state.db_pool).await?;

        let user_selections = match user_id {
            Some(user_id) => PollVote::by_poll_and_user(&poll.id, user_id, &state.db_pool)
                .await?
                .map(|vote| vote.selected),
            None => None,
        };

        Ok(PollInfo {
            is_finished: poll.is_finished(Utc::now()),
            has_voted: user_selections.is_some(),
            options: poll.options,
            counts: poll.option_counts,
            ends_at: poll.ends_at,
            multiple_choice: poll.multiple_choice,
            total_participants,
            user_selections,
        })
    }
}
