use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Catch-all bridge from `anyhow` into a 500 response. Expected
/// interaction conflicts (duplicate ballots, finished polls and the
/// like) are mapped to coded client errors before they reach this.
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        log::error!("Error from route, {:#?}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Error: {}", self.0),
        )
            .into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
