//! Session identifier issuance
//!
//! Session identifiers double as bearer credentials and storage keys, so
//! they come from the OS CSPRNG with enough entropy that collisions and
//! guessing are out of the question at any plausible session volume.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngExt;

/// Source of fresh session identifiers.
pub trait IdIssuer: Send + Sync {
    /// Produce a new opaque identifier. Outputs are unpredictable and
    /// uncorrelated with prior outputs.
    fn generate(&self) -> String;
}

/// CSPRNG-backed issuer: 32 random bytes as URL-safe base64 (no padding),
/// cookie- and key-safe as-is.
pub struct RandomIdIssuer;

impl IdIssuer for RandomIdIssuer {
    fn generate(&self) -> String {
        let mut bytes = [0u8; 32];
        rand::rng().fill(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }
}
