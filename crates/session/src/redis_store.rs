//! Redis-backed session store
//!
//! Sessions are plain string keys holding the access token, written with
//! `SET ... EXAT <unix-seconds>` so Redis itself enforces the absolute
//! expiration. A multiplexed connection is established once at startup and
//! cloned per operation.

use std::future::Future;
use std::pin::Pin;

use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;
use tracing::debug;

use crate::error::{Error, Result};
use crate::store::SessionStore;

pub struct RedisSessionStore {
    conn: MultiplexedConnection,
}

impl RedisSessionStore {
    /// Connect to the store at the given URL (e.g. `redis://127.0.0.1:6379`).
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| Error::Unavailable(format!("invalid redis url: {e}")))?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| Error::Unavailable(format!("redis connection failed: {e}")))?;
        debug!(url, "connected to session store");
        Ok(Self { conn })
    }
}

fn store_err(e: redis::RedisError) -> Error {
    Error::Unavailable(e.to_string())
}

impl SessionStore for RedisSessionStore {
    fn save<'a>(
        &'a self,
        session_id: &'a str,
        token: &'a str,
        expires_at: u64,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        let mut conn = self.conn.clone();
        Box::pin(async move {
            let _: () = redis::cmd("SET")
                .arg(session_id)
                .arg(token)
                .arg("EXAT")
                .arg(expires_at)
                .query_async(&mut conn)
                .await
                .map_err(store_err)?;
            debug!(expires_at, "session saved");
            Ok(())
        })
    }

    fn get<'a>(
        &'a self,
        session_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<String>>> + Send + 'a>> {
        let mut conn = self.conn.clone();
        Box::pin(async move {
            let token: Option<String> = conn.get(session_id).await.map_err(store_err)?;
            Ok(token)
        })
    }

    fn remove<'a>(
        &'a self,
        session_id: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        let mut conn = self.conn.clone();
        Box::pin(async move {
            // DEL of a missing key is a no-op, which gives remove its
            // idempotence for free.
            let _: () = conn.del(session_id).await.map_err(store_err)?;
            debug!("session removed");
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connect_rejects_malformed_url() {
        let err = RedisSessionStore::connect("not-a-redis-url")
            .await
            .unwrap_err();
        assert!(
            err.to_string().contains("invalid redis url"),
            "got: {err}"
        );
    }
}
