//! Google OAuth2 and Drive endpoint constants
//!
//! These identify the public provider surface, not secrets. The client ID
//! and secret live in the gate's configuration.

/// Authorization endpoint the browser is redirected to for login
pub const AUTHORIZATION_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Token endpoint for the authorization-code exchange
pub const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

/// Revocation endpoint hit on logout
pub const REVOCATION_ENDPOINT: &str = "https://oauth2.googleapis.com/revoke";

/// Drive v2 file-listing endpoint
pub const DRIVE_FILES_ENDPOINT: &str = "https://www.googleapis.com/drive/v2/files";

/// The one scope this gate requests: read-only Drive metadata.
pub const DRIVE_METADATA_SCOPE: &str = "https://www.googleapis.com/auth/drive.metadata.readonly";
