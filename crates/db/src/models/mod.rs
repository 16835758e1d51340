pub mod best_post;
pub mod comment;
pub mod like;
pub mod poll;
pub mod poll_vote;
pub mod post;

pub use best_post::BestPost;
pub use comment::Comment;
pub use comment::Reply;
pub use like::Like;
pub use poll::Poll;
pub use poll_vote::PollVote;
pub use post::Post;
