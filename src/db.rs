//! Database module
//!
//! Persists one search state row per chat user.

mod schema;

pub use schema::*;

use crate::catalog::Location;
use crate::state_machine::{ConversationState, SearchState, Step};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Database connection lock poisoned")]
    LockPoisoned,
}

pub type DbResult<T> = Result<T, DbError>;

/// Thread-safe database handle
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create database at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    #[allow(dead_code)] // Used in tests
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.run_migrations()?;
        Ok(db)
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| DbError::LockPoisoned)
    }

    fn run_migrations(&self) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Get the stored state for a user, if any
    pub fn get_state(&self, user_id: &str) -> DbResult<Option<StoredConversation>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT user_id, step, latitude, longitude, genre, budget, created_at, updated_at
             FROM conversation_states WHERE user_id = ?1",
        )?;

        let row = stmt
            .query_row(params![user_id], |row| {
                let user_id: String = row.get(0)?;
                let step: i64 = row.get(1)?;
                let latitude: Option<f64> = row.get(2)?;
                let longitude: Option<f64> = row.get(3)?;
                let genre: Option<String> = row.get(4)?;
                let budget: Option<String> = row.get(5)?;
                let created_at: String = row.get(6)?;
                let updated_at: String = row.get(7)?;

                let location = match (latitude, longitude) {
                    (Some(lat), Some(lng)) => Some(Location::new(lat, lng)),
                    _ => None,
                };
                let search = Step::from_i64(step)
                    .and_then(|step| SearchState::from_parts(step, location, genre, budget))
                    .unwrap_or_else(|| {
                        tracing::warn!(user_id = %user_id, step, "Inconsistent stored state, starting over");
                        SearchState::New
                    });

                Ok(StoredConversation {
                    state: ConversationState::with_search(user_id, search),
                    created_at: parse_datetime(&created_at),
                    updated_at: parse_datetime(&updated_at),
                })
            })
            .optional()?;

        Ok(row)
    }

    /// Insert the user's state, or replace the stored one
    pub fn upsert_state(&self, state: &ConversationState) -> DbResult<()> {
        let conn = self.lock()?;
        let now = Utc::now().to_rfc3339();
        let location = state.search.location();

        conn.execute(
            "INSERT INTO conversation_states
                 (user_id, step, latitude, longitude, genre, budget, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
             ON CONFLICT(user_id) DO UPDATE SET
                 step = excluded.step,
                 latitude = excluded.latitude,
                 longitude = excluded.longitude,
                 genre = excluded.genre,
                 budget = excluded.budget,
                 updated_at = excluded.updated_at",
            params![
                state.user_id,
                state.step().as_i64(),
                location.map(|l| l.latitude),
                location.map(|l| l.longitude),
                state.search.genre(),
                state.search.budget(),
                now,
            ],
        )?;

        Ok(())
    }

    /// Number of users with a stored state
    pub fn count_states(&self) -> DbResult<i64> {
        let conn = self.lock()?;
        let count = conn.query_row("SELECT COUNT(*) FROM conversation_states", [], |row| {
            row.get(0)
        })?;
        Ok(count)
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).map_or_else(|_| Utc::now(), |dt| dt.with_timezone(&Utc))
}
