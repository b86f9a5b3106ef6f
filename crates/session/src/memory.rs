//! In-memory session store
//!
//! Backs tests and local runs without a Redis. Same observable contract as
//! the Redis store: expiration is absolute in whole seconds and an expired
//! entry is indistinguishable from one that never existed.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::Mutex;

use crate::error::Result;
use crate::store::SessionStore;

#[derive(Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, (String, u64)>>,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw (token, expires_at) entry, bypassing the expiry check. For tests
    /// and diagnostics; production code goes through `get`.
    pub async fn peek(&self, session_id: &str) -> Option<(String, u64)> {
        self.entries.lock().await.get(session_id).cloned()
    }
}

impl SessionStore for MemorySessionStore {
    fn save<'a>(
        &'a self,
        session_id: &'a str,
        token: &'a str,
        expires_at: u64,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            self.entries
                .lock()
                .await
                .insert(session_id.to_owned(), (token.to_owned(), expires_at));
            Ok(())
        })
    }

    fn get<'a>(
        &'a self,
        session_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<String>>> + Send + 'a>> {
        Box::pin(async move {
            let mut entries = self.entries.lock().await;
            match entries.get(session_id) {
                Some((token, expires_at)) if *expires_at > now_secs() => Ok(Some(token.clone())),
                Some(_) => {
                    // Lazy purge, mirroring the backend-enforced TTL.
                    entries.remove(session_id);
                    Ok(None)
                }
                None => Ok(None),
            }
        })
    }

    fn remove<'a>(
        &'a self,
        session_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            self.entries.lock().await.remove(session_id);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_then_get_returns_token() {
        let store = MemorySessionStore::new();
        store
            .save("an auth", "a token", now_secs() + 60)
            .await
            .unwrap();
        assert_eq!(store.get("an auth").await.unwrap().as_deref(), Some("a token"));
    }

    #[tokio::test]
    async fn save_overwrites_existing_entry() {
        let store = MemorySessionStore::new();
        store
            .save("an auth", "old token", now_secs() + 60)
            .await
            .unwrap();
        store
            .save("an auth", "new token", now_secs() + 120)
            .await
            .unwrap();
        assert_eq!(
            store.get("an auth").await.unwrap().as_deref(),
            Some("new token")
        );
    }

    #[tokio::test]
    async fn expired_and_missing_are_indistinguishable() {
        let store = MemorySessionStore::new();
        store
            .save("expired", "a token", now_secs().saturating_sub(1))
            .await
            .unwrap();

        let expired = store.get("expired").await.unwrap();
        let missing = store.get("never-existed").await.unwrap();
        assert_eq!(expired, None);
        assert_eq!(missing, None);
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let store = MemorySessionStore::new();
        store
            .save("an auth", "a token", now_secs() + 60)
            .await
            .unwrap();

        store.remove("an auth").await.unwrap();
        assert_eq!(store.get("an auth").await.unwrap(), None);

        // Removing again (or removing something never saved) succeeds.
        store.remove("an auth").await.unwrap();
        store.remove("never-existed").await.unwrap();
    }

    #[tokio::test]
    async fn peek_reads_raw_entry() {
        let store = MemorySessionStore::new();
        store.save("an auth", "a token", 1625608805).await.unwrap();
        assert_eq!(
            store.peek("an auth").await,
            Some(("a token".to_owned(), 1625608805))
        );
    }
}
