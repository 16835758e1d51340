use serde::Serialize;
use serde_with::skip_serializing_none;

use crate::common::likes::ToggleOutcome;

/// Body returned by the toggle endpoint; the discriminant tells the
/// client what just happened without a follow-up read.
#[derive(Serialize, Debug)]
pub struct LikeToggle {
    pub outcome: ToggleOutcome,
}

/// Like decoration for a target: the count, and whether the calling
/// user likes it (absent for anonymous readers).
#[derive(Serialize, Debug)]
#[skip_serializing_none]
pub struct LikeState {
    pub likes: i64,
    pub liked: Option<bool>,
}
