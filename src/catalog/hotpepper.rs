//! Recruit HotPepper gourmet API client

use super::types::{CandidateStore, Genre, SearchQuery};
use super::{Catalog, CatalogError};
use crate::budget::BudgetBand;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://webservice.recruit.co.jp/hotpepper";

/// Catalog backed by the HotPepper XML API
pub struct HotPepperCatalog {
    client: Client,
    api_key: String,
    base_url: String,
}

impl HotPepperCatalog {
    pub fn new(
        api_key: impl Into<String>,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/{}/v1/", self.base_url, method)
    }

    async fn request<T>(&self, method: &str, query: &[(&str, String)]) -> Result<T, CatalogError>
    where
        T: DeserializeOwned + HasApiErrors,
    {
        let response = self
            .client
            .get(self.endpoint(method))
            .query(&[("key", self.api_key.as_str())])
            .query(query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CatalogError::timeout(format!("Request timeout: {e}"))
                } else {
                    CatalogError::network(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CatalogError::network(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(CatalogError::status(format!("HTTP {status}: {body}")));
        }

        let results: T = quick_xml::de::from_str(&body)
            .map_err(|e| CatalogError::parse(format!("Failed to parse {method} response: {e}")))?;

        if let Some(error) = results.errors().first() {
            return Err(CatalogError::api(format!(
                "{} (code {})",
                error.message, error.code
            )));
        }

        Ok(results)
    }
}

#[async_trait]
impl Catalog for HotPepperCatalog {
    async fn fetch_genres(&self) -> Result<Vec<Genre>, CatalogError> {
        let results: GenreResults = self.request("genre", &[]).await?;
        Ok(results
            .genres
            .into_iter()
            .map(|g| Genre::new(g.code, g.name))
            .collect())
    }

    async fn fetch_budget_bands(&self) -> Result<Vec<BudgetBand>, CatalogError> {
        let results: BudgetResults = self.request("budget", &[]).await?;
        Ok(results
            .budgets
            .into_iter()
            .map(|b| BudgetBand::from_display_name(&b.name, b.code))
            .collect())
    }

    async fn fetch_candidates(&self, query: &SearchQuery) -> Result<Vec<CandidateStore>, CatalogError> {
        let params = [
            ("lat", query.location.latitude.to_string()),
            ("lng", query.location.longitude.to_string()),
            ("genre", query.genre.clone()),
            ("budget", query.budget.clone()),
            ("count", query.limit.to_string()),
        ];
        let results: ShopResults = self.request("gourmet", &params).await?;
        Ok(results
            .shops
            .into_iter()
            .map(|s| CandidateStore {
                name: s.name,
                address: s.address,
                logo_image_url: s.logo_image,
                detail_url: s.urls.pc,
            })
            .collect())
    }
}

// HotPepper XML documents. Every response is a `<results>` root; failures
// carry one or more `<error>` children instead of data.

trait HasApiErrors {
    fn errors(&self) -> &[ApiError];
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    code: String,
}

#[derive(Debug, Deserialize)]
struct GenreResults {
    #[serde(default, rename = "error")]
    errors: Vec<ApiError>,
    #[serde(default, rename = "genre")]
    genres: Vec<CodeName>,
}

#[derive(Debug, Deserialize)]
struct BudgetResults {
    #[serde(default, rename = "error")]
    errors: Vec<ApiError>,
    #[serde(default, rename = "budget")]
    budgets: Vec<CodeName>,
}

#[derive(Debug, Deserialize)]
struct ShopResults {
    #[serde(default, rename = "error")]
    errors: Vec<ApiError>,
    #[serde(default, rename = "shop")]
    shops: Vec<Shop>,
}

impl HasApiErrors for GenreResults {
    fn errors(&self) -> &[ApiError] {
        &self.errors
    }
}

impl HasApiErrors for BudgetResults {
    fn errors(&self) -> &[ApiError] {
        &self.errors
    }
}

impl HasApiErrors for ShopResults {
    fn errors(&self) -> &[ApiError] {
        &self.errors
    }
}

#[derive(Debug, Deserialize)]
struct CodeName {
    code: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct Shop {
    name: String,
    #[serde(default)]
    address: String,
    #[serde(default)]
    logo_image: String,
    #[serde(default)]
    urls: ShopUrls,
}

#[derive(Debug, Default, Deserialize)]
struct ShopUrls {
    #[serde(default)]
    pc: String,
}
