pub mod like;
pub mod poll;
pub mod post;

pub use like::LikeState;
pub use like::LikeToggle;
pub use poll::PollInfo;
pub use post::RankedPost;
