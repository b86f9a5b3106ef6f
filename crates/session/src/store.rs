//! The session store boundary

use std::future::Future;
use std::pin::Pin;

use crate::error::Result;

/// Expiring key-value mapping from session identifier to provider access
/// token.
///
/// Expiration is enforced by the backend, not checked by callers: once the
/// absolute instant passes, `get` answers as if the entry never existed.
/// Callers cannot (and must not need to) distinguish "expired" from "never
/// saved".
///
/// Uses `Pin<Box<dyn Future>>` return types for dyn-compatibility
/// (`Arc<dyn SessionStore>`).
pub trait SessionStore: Send + Sync {
    /// Persist the mapping, overwriting any existing entry for the same
    /// identifier. `expires_at` is an absolute unix timestamp in whole
    /// seconds; the backend purges the entry at or after that instant.
    fn save<'a>(
        &'a self,
        session_id: &'a str,
        token: &'a str,
        expires_at: u64,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

    /// Fetch the token for a live session, or `None` for anything else.
    fn get<'a>(
        &'a self,
        session_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<String>>> + Send + 'a>>;

    /// Delete the mapping. Removing an identifier that does not exist is
    /// not an error.
    fn remove<'a>(
        &'a self,
        session_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;
}
