//! Error types for session storage

/// Errors from session store operations.
///
/// Every backend failure collapses to "unavailable" — callers either
/// propagate it to the request boundary or, on the logout path, log it and
/// move on. There is no partial-failure taxonomy worth distinguishing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

/// Result alias for store operations.
pub type Result<T> = std::result::Result<T, Error>;
