//! Request-boundary error mapping
//!
//! Failures on the callback and content paths terminate the request with a
//! definite status instead of escaping the handler: provider communication
//! failures (token exchange, file listing) map to 502 Bad Gateway, session
//! store failures to 500. Logout-path failures never reach this type — they
//! are detached from the response (see the logout handler).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Provider(google_auth::Error),

    #[error(transparent)]
    Store(#[from] session::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Provider(_) => StatusCode::BAD_GATEWAY,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        error!(error = %self, "request failed");
        (status, self.to_string()).into_response()
    }
}
