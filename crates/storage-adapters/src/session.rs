//! In-process session store.
//!
//! Sessions live in a concurrent map and expire with the process, which is
//! the lifetime policy this application promises. A multi-node deployment
//! would swap in a shared store behind the same port.

use async_trait::async_trait;
use dashmap::DashMap;
use domains::models::SessionData;
use domains::ports::SessionStore;

#[derive(Default)]
pub struct MemorySessionStore {
    sessions: DashMap<String, SessionData>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, token: &str) -> anyhow::Result<Option<SessionData>> {
        Ok(self.sessions.get(token).map(|entry| entry.clone()))
    }

    async fn save(&self, token: &str, data: SessionData) -> anyhow::Result<()> {
        self.sessions.insert(token.to_string(), data);
        Ok(())
    }

    async fn delete(&self, token: &str) -> anyhow::Result<()> {
        self.sessions.remove(token);
        Ok(())
    }
}
