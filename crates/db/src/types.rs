use std::fmt;

use diesel_derive_newtype::DieselNewType;
use serde::{Deserialize, Serialize};
use svix_ksuid::KsuidLike;

#[derive(DieselNewType, Debug, Hash, PartialEq, Eq, Clone)]
pub struct DbId(String);

impl Default for DbId {
    fn default() -> Self {
        DbId(svix_ksuid::Ksuid::new(None, None).to_string())
    }
}

impl fmt::Display for DbId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for DbId {
    fn from(string: String) -> Self {
        DbId(string)
    }
}

impl From<svix_ksuid::Ksuid> for DbId {
    fn from(id: svix_ksuid::Ksuid) -> Self {
        DbId(id.to_string())
    }
}

/// What a like points at. `External` targets are owned by another
/// service and are trusted as already validated by the caller.
#[derive(
    diesel_derive_enum::DbEnum, Debug, Clone, Copy, PartialEq, PartialOrd, Ord, Eq, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[ExistingTypePath = "crate::schema::sql_types::LikeTarget"]
pub enum DbLikeTarget {
    Post,
    Comment,
    Reply,
    External,
}

impl DbLikeTarget {
    pub fn from_string(string: &str) -> Option<Self> {
        match string {
            "post" => Some(Self::Post),
            "comment" => Some(Self::Comment),
            "reply" => Some(Self::Reply),
            "external" => Some(Self::External),
            _ => None,
        }
    }

    /// Segment used when building cache keys for this target type.
    pub fn cache_segment(&self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Comment => "comment",
            Self::Reply => "reply",
            Self::External => "external",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DbLikeTarget;

    #[test]
    fn like_target_from_string() {
        assert_eq!(DbLikeTarget::from_string("post"), Some(DbLikeTarget::Post));
        assert_eq!(
            DbLikeTarget::from_string("reply"),
            Some(DbLikeTarget::Reply)
        );
        assert_eq!(DbLikeTarget::from_string("boost"), None);
    }

    #[test]
    fn cache_segment_round_trips() {
        for target in [
            DbLikeTarget::Post,
            DbLikeTarget::Comment,
            DbLikeTarget::Reply,
            DbLikeTarget::External,
        ] {
            assert_eq!(DbLikeTarget::from_string(target.cache_segment()), Some(target));
        }
    }
}
