//! Session persistence and identifier issuance for drive-gate
//!
//! A session maps an opaque identifier (the browser cookie value) to the
//! provider access token it was created with, and exists only between its
//! creation instant and a backend-enforced absolute expiration. This crate
//! holds the `SessionStore` boundary, the Redis-backed implementation used in
//! production, an in-memory implementation for tests and local runs, and the
//! `IdIssuer` that mints the identifiers.

pub mod error;
pub mod issuer;
pub mod memory;
pub mod redis_store;
pub mod store;

pub use error::{Error, Result};
pub use issuer::{IdIssuer, RandomIdIssuer};
pub use memory::MemorySessionStore;
pub use redis_store::RedisSessionStore;
pub use store::SessionStore;
