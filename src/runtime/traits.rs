//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the dispatcher with mock implementations.

use crate::db::Database;
use crate::state_machine::ConversationState;
use async_trait::async_trait;
use std::sync::Arc;

/// Keyed storage for per-user conversation state
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Get the user's state, `None` if the user has never been seen
    async fn get(&self, user_id: &str) -> Result<Option<ConversationState>, String>;

    /// Create the user's state or replace the existing one
    async fn upsert(&self, state: &ConversationState) -> Result<(), String>;
}

#[async_trait]
impl<T: StateStore + ?Sized> StateStore for Arc<T> {
    async fn get(&self, user_id: &str) -> Result<Option<ConversationState>, String> {
        (**self).get(user_id).await
    }

    async fn upsert(&self, state: &ConversationState) -> Result<(), String> {
        (**self).upsert(state).await
    }
}

/// SQLite-backed state store
#[derive(Clone)]
pub struct DatabaseStorage {
    db: Database,
}

impl DatabaseStorage {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    #[allow(dead_code)] // Useful for tests
    pub fn inner(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl StateStore for DatabaseStorage {
    async fn get(&self, user_id: &str) -> Result<Option<ConversationState>, String> {
        self.db
            .get_state(user_id)
            .map(|stored| stored.map(|s| s.state))
            .map_err(|e| e.to_string())
    }

    async fn upsert(&self, state: &ConversationState) -> Result<(), String> {
        self.db.upsert_state(state).map_err(|e| e.to_string())
    }
}
