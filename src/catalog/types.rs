//! Catalog reference data and search results

use serde::{Deserialize, Serialize};

/// A restaurant genre offered by the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub code: String,
    pub name: String,
}

impl Genre {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

/// Coordinates shared by the user
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A store returned by a catalog search, projected to what the reply shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateStore {
    pub name: String,
    pub address: String,
    pub logo_image_url: String,
    pub detail_url: String,
}

/// Parameters of a store search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub location: Location,
    pub genre: String,
    pub budget: String,
    pub limit: u32,
}

impl SearchQuery {
    pub const DEFAULT_LIMIT: u32 = 10;

    pub fn new(location: Location, genre: impl Into<String>, budget: impl Into<String>) -> Self {
        Self {
            location,
            genre: genre.into(),
            budget: budget.into(),
            limit: Self::DEFAULT_LIMIT,
        }
    }
}
