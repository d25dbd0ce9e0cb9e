//! Catalog API client.
//!
//! Plain REST/JSON over `reqwest`. Product reads are cached using `moka`
//! (5-minute TTL); stock reads are never cached (mutable state).
//!
//! # Endpoints
//!
//! - `GET /products` - full product list
//! - `GET /products/{id}` - single product
//! - `GET /stock/{id}` - available quantity for a product

mod cache;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use thiserror::Error;
use tracing::{debug, instrument};

use shoebox_core::{Product, ProductId, Stock};

use crate::config::CatalogConfig;
use cache::CacheValue;

/// Errors that can occur when interacting with the catalog API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Catalog API answered with a non-success status.
    #[error("Catalog API returned status {0}")]
    Status(reqwest::StatusCode),
}

// =============================================================================
// CatalogClient
// =============================================================================

/// Client for the catalog API.
///
/// Provides typed access to products and stock levels. Product reads are
/// cached for 5 minutes.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<String, CacheValue>,
}

impl CatalogClient {
    /// Create a new catalog API client.
    #[must_use]
    pub fn new(config: &CatalogConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        let base_url = config.base_url.as_str().trim_end_matches('/').to_string();

        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                base_url,
                cache,
            }),
        }
    }

    /// Execute a GET request and decode the JSON body.
    async fn fetch<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, CatalogError> {
        let url = format!("{}{path}", self.inner.base_url);

        let response = self.inner.client.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(path.to_string()));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %response_text.chars().take(200).collect::<String>(),
                "Catalog API returned non-success status"
            );
            return Err(CatalogError::Status(status));
        }

        serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %response_text.chars().take(200).collect::<String>(),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get the full product list.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_products(&self) -> Result<Vec<Product>, CatalogError> {
        const CACHE_KEY: &str = "products";

        // Check cache
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(CACHE_KEY).await {
            debug!("Cache hit for product list");
            return Ok(products);
        }

        let products: Vec<Product> = self.fetch("/products").await?;

        // Cache the result
        self.inner
            .cache
            .insert(CACHE_KEY.to_string(), CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Get a product by its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the API request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn get_product(&self, product_id: ProductId) -> Result<Product, CatalogError> {
        let cache_key = format!("product:{product_id}");

        // Check cache
        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let product: Product = self.fetch(&format!("/products/{product_id}")).await?;

        // Cache the result
        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    // =========================================================================
    // Stock Methods (not cached - mutable state)
    // =========================================================================

    /// Get the current stock level for a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the stock record is not found or the API request
    /// fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn get_stock(&self, product_id: ProductId) -> Result<Stock, CatalogError> {
        self.fetch(&format!("/stock/{product_id}")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    #[test]
    fn test_catalog_error_display() {
        let err = CatalogError::NotFound("/products/99".to_string());
        assert_eq!(err.to_string(), "Not found: /products/99");

        let err = CatalogError::Status(reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.to_string(),
            "Catalog API returned status 500 Internal Server Error"
        );
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let config = CatalogConfig {
            base_url: Url::parse("http://localhost:3333/").expect("valid url"),
        };
        let client = CatalogClient::new(&config);
        assert_eq!(client.inner.base_url, "http://localhost:3333");
    }
}
