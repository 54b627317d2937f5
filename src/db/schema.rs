//! Database schema and types

use crate::state_machine::ConversationState;
use chrono::{DateTime, Utc};

/// SQL schema for initialization
pub const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS conversation_states (
    user_id TEXT PRIMARY KEY,
    step INTEGER NOT NULL DEFAULT 0,
    latitude REAL,
    longitude REAL,
    genre TEXT,
    budget TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
";

/// A conversation state row with its bookkeeping timestamps
#[derive(Debug, Clone)]
pub struct StoredConversation {
    pub state: ConversationState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
