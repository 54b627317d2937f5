//! Mock implementations for testing
//!
//! These mocks enable dispatcher and HTTP tests without real I/O.

use super::traits::StateStore;
use crate::budget::BudgetBand;
use crate::catalog::{CandidateStore, Catalog, CatalogError, Genre, SearchQuery};
use crate::state_machine::ConversationState;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

// ============================================================================
// In-memory State Store
// ============================================================================

/// State store backed by a map
#[allow(dead_code)]
pub struct InMemoryStore {
    states: Mutex<HashMap<String, ConversationState>>,
    /// Number of writes performed
    pub writes: Mutex<usize>,
}

#[allow(dead_code)]
impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            states: Mutex::new(HashMap::new()),
            writes: Mutex::new(0),
        }
    }

    /// Seed a state directly
    pub fn insert(&self, state: ConversationState) {
        self.states
            .lock()
            .unwrap()
            .insert(state.user_id.clone(), state);
    }

    /// Get current state for a user
    pub fn current(&self, user_id: &str) -> Option<ConversationState> {
        self.states.lock().unwrap().get(user_id).cloned()
    }

    pub fn write_count(&self) -> usize {
        *self.writes.lock().unwrap()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StateStore for InMemoryStore {
    async fn get(&self, user_id: &str) -> Result<Option<ConversationState>, String> {
        Ok(self.current(user_id))
    }

    async fn upsert(&self, state: &ConversationState) -> Result<(), String> {
        *self.writes.lock().unwrap() += 1;
        self.insert(state.clone());
        Ok(())
    }
}

// ============================================================================
// Mock Catalog
// ============================================================================

/// Catalog returning canned data, optionally failing per operation
#[allow(dead_code)]
#[derive(Default)]
pub struct MockCatalog {
    genres: Vec<Genre>,
    bands: Vec<BudgetBand>,
    stores: Vec<CandidateStore>,
    genre_error: Mutex<Option<CatalogError>>,
    band_error: Mutex<Option<CatalogError>>,
    search_error: Mutex<Option<CatalogError>>,
    genre_calls: Mutex<usize>,
    /// Record of all searches made
    pub searches: Mutex<Vec<SearchQuery>>,
}

#[allow(dead_code)]
impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_genres(mut self, genres: Vec<Genre>) -> Self {
        self.genres = genres;
        self
    }

    pub fn with_bands(mut self, bands: Vec<BudgetBand>) -> Self {
        self.bands = bands;
        self
    }

    pub fn with_stores(mut self, stores: Vec<CandidateStore>) -> Self {
        self.stores = stores;
        self
    }

    /// Make the next genre fetch fail
    pub fn fail_genres(&self, error: CatalogError) {
        *self.genre_error.lock().unwrap() = Some(error);
    }

    /// Make the next budget fetch fail
    pub fn fail_bands(&self, error: CatalogError) {
        *self.band_error.lock().unwrap() = Some(error);
    }

    /// Make the next store search fail
    pub fn fail_search(&self, error: CatalogError) {
        *self.search_error.lock().unwrap() = Some(error);
    }

    pub fn genre_calls(&self) -> usize {
        *self.genre_calls.lock().unwrap()
    }

    pub fn recorded_searches(&self) -> Vec<SearchQuery> {
        self.searches.lock().unwrap().clone()
    }
}

#[async_trait]
impl Catalog for MockCatalog {
    async fn fetch_genres(&self) -> Result<Vec<Genre>, CatalogError> {
        *self.genre_calls.lock().unwrap() += 1;
        match self.genre_error.lock().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(self.genres.clone()),
        }
    }

    async fn fetch_budget_bands(&self) -> Result<Vec<BudgetBand>, CatalogError> {
        match self.band_error.lock().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(self.bands.clone()),
        }
    }

    async fn fetch_candidates(&self, query: &SearchQuery) -> Result<Vec<CandidateStore>, CatalogError> {
        self.searches.lock().unwrap().push(query.clone());
        match self.search_error.lock().unwrap().take() {
            Some(error) => Err(error),
            None => Ok(self.stores.clone()),
        }
    }
}
