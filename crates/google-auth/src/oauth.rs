//! Authorization URL construction and the token endpoint payload
//!
//! URL construction is pure: the caller supplies the redirect target and the
//! opaque `state`, and gets back the fully-encoded login URL. The `state`
//! value is passed through exactly as given (then percent-encoded like every
//! other parameter), so whatever the caller packed into it survives the
//! provider round trip after one decode.

use serde::{Deserialize, Serialize};

/// Response from the token endpoint.
///
/// `expires_in` is a delta in seconds from the response time. The caller
/// converts this to an absolute timestamp when creating the session.
#[derive(Debug, Deserialize, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Seconds until the access token expires (delta, not absolute)
    pub expires_in: u64,
}

/// Build the provider login URL with exactly the parameters of the
/// server-side authorization-code flow: client identifier, redirect target,
/// `response_type=code`, scope, and opaque state.
pub fn authorization_url(
    endpoint: &str,
    client_id: &str,
    redirect_uri: &str,
    scope: &str,
    state: &str,
) -> String {
    format!(
        "{endpoint}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}",
        urlencoding::encode(client_id),
        urlencoding::encode(redirect_uri),
        urlencoding::encode(scope),
        urlencoding::encode(state),
    )
}
