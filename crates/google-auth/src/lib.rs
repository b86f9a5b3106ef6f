//! Google OAuth2 + Drive client for drive-gate
//!
//! Covers the provider side of the login flow and the one authenticated API
//! this gate fronts:
//! 1. `oauth::authorization_url()` builds the login redirect target
//! 2. `GoogleDrive::exchange_code()` trades the callback code for a token
//! 3. `GoogleDrive::list_files()` fetches the file listing with that token
//! 4. `GoogleDrive::revoke_token()` invalidates the token on logout
//!
//! This crate is a standalone library with no dependency on the gate binary.
//! The `DriveProvider` trait is the substitution seam: the router holds an
//! `Arc<dyn DriveProvider>` so tests can script provider behavior without
//! any network.

pub mod client;
pub mod constants;
pub mod drive;
pub mod error;
pub mod oauth;

pub use client::{Endpoints, GoogleDrive};
pub use constants::*;
pub use drive::{DriveFile, FileList, FileOwner};
pub use error::{Error, Result};
pub use oauth::TokenResponse;

use std::future::Future;
use std::pin::Pin;

/// Abstraction over the OAuth provider and its file-listing API.
///
/// One method per outbound interaction the gate performs. URL construction is
/// pure; the other three are single network calls with no retry.
///
/// Uses `Pin<Box<dyn Future>>` return types for dyn-compatibility
/// (`Arc<dyn DriveProvider>`).
pub trait DriveProvider: Send + Sync {
    /// Build the provider login URL for the given callback target, carrying
    /// `state` opaquely. No network call.
    fn authorization_url(&self, redirect_uri: &str, state: &str) -> String;

    /// Exchange an authorization code for an access token. `redirect_uri`
    /// must match the one the code was issued against.
    fn exchange_code<'a>(
        &'a self,
        redirect_uri: &'a str,
        code: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<TokenResponse>> + Send + 'a>>;

    /// Invalidate an access token. Callers treat failure as best-effort.
    fn revoke_token<'a>(
        &'a self,
        access_token: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

    /// List files visible to the token's owner, optionally filtered by a
    /// title substring.
    fn list_files<'a>(
        &'a self,
        access_token: &'a str,
        title_query: Option<&'a str>,
    ) -> Pin<Box<dyn Future<Output = Result<FileList>> + Send + 'a>>;
}
