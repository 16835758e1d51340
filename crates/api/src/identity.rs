//! Caller identity. Authentication itself lives at the gateway; this
//! service only consumes the resolved user id it forwards in the
//! `x-user-id` header. Handlers take `Identity` where a user is
//! required and `Option<Identity>` where anonymous access is fine.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts, http::StatusCode};
use db::types::DbId;

use crate::error::ApiError;

pub const USER_ID_HEADER: &str = "x-user-id";

#[derive(Clone, Debug)]
pub struct Identity(pub DbId);

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
        {
            Some(user_id) => Ok(Identity(DbId::from(user_id.to_string()))),
            None => Err(ApiError::new(
                "This action requires an authenticated user",
                StatusCode::UNAUTHORIZED,
            )),
        }
    }
}
