//! Restaurant catalog abstraction
//!
//! Read-only access to the search provider's reference data (genres, budget
//! bands) and its store search.

mod error;
mod hotpepper;
mod types;

pub use error::{CatalogError, CatalogErrorKind};
pub use hotpepper::{HotPepperCatalog, DEFAULT_BASE_URL};
pub use types::*;

use crate::budget::BudgetBand;
use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for catalog providers
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Genres in the provider's order
    async fn fetch_genres(&self) -> Result<Vec<Genre>, CatalogError>;

    /// Budget bands in the provider's order (ascending by price)
    async fn fetch_budget_bands(&self) -> Result<Vec<BudgetBand>, CatalogError>;

    /// Stores near a location. An empty list is a valid answer, not an error.
    async fn fetch_candidates(&self, query: &SearchQuery) -> Result<Vec<CandidateStore>, CatalogError>;
}

#[async_trait]
impl<T: Catalog + ?Sized> Catalog for Arc<T> {
    async fn fetch_genres(&self) -> Result<Vec<Genre>, CatalogError> {
        (**self).fetch_genres().await
    }

    async fn fetch_budget_bands(&self) -> Result<Vec<BudgetBand>, CatalogError> {
        (**self).fetch_budget_bands().await
    }

    async fn fetch_candidates(&self, query: &SearchQuery) -> Result<Vec<CandidateStore>, CatalogError> {
        (**self).fetch_candidates(query).await
    }
}

/// Logging wrapper for catalog providers
pub struct LoggingCatalog {
    inner: Arc<dyn Catalog>,
}

impl LoggingCatalog {
    pub fn new(inner: Arc<dyn Catalog>) -> Self {
        Self { inner }
    }

    fn log<T>(operation: &str, started: std::time::Instant, result: &Result<Vec<T>, CatalogError>) {
        let duration = started.elapsed();
        match result {
            Ok(items) => {
                tracing::info!(
                    operation,
                    duration_ms = %duration.as_millis(),
                    count = items.len(),
                    "Catalog request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    operation,
                    duration_ms = %duration.as_millis(),
                    kind = e.kind.as_str(),
                    error = %e.message,
                    "Catalog request failed"
                );
            }
        }
    }
}

#[async_trait]
impl Catalog for LoggingCatalog {
    async fn fetch_genres(&self) -> Result<Vec<Genre>, CatalogError> {
        let started = std::time::Instant::now();
        let result = self.inner.fetch_genres().await;
        Self::log("genre", started, &result);
        result
    }

    async fn fetch_budget_bands(&self) -> Result<Vec<BudgetBand>, CatalogError> {
        let started = std::time::Instant::now();
        let result = self.inner.fetch_budget_bands().await;
        Self::log("budget", started, &result);
        result
    }

    async fn fetch_candidates(&self, query: &SearchQuery) -> Result<Vec<CandidateStore>, CatalogError> {
        let started = std::time::Instant::now();
        let result = self.inner.fetch_candidates(query).await;
        Self::log("gourmet", started, &result);
        result
    }
}
