//! Error types for provider operations

/// Errors from Google OAuth and Drive calls.
///
/// Exchange, revocation, and listing each get their own variant so the gate
/// can map them to distinct HTTP responses at the request boundary.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("token exchange failed: {0}")]
    TokenExchange(String),

    #[error("token revocation failed: {0}")]
    Revocation(String),

    #[error("file listing failed: {0}")]
    Listing(String),
}

/// Result alias for provider operations.
pub type Result<T> = std::result::Result<T, Error>;
