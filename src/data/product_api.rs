//! Product data access through the cache
//!
//! Every lookup consults the [`TimedCache`] first and only goes to the network
//! on a miss. Successful responses are written back; failures never are.

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use super::{ProductDetail, ProductSummary};
use crate::api::{FetchClient, FetchError, RequestOptions};
use crate::cache::TimedCache;

/// Cache key for the product list
const PRODUCTS_CACHE_KEY: &str = "products";

/// Errors that can occur when loading products
#[derive(Debug, Error)]
pub enum DataError {
    /// The API request failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The API answered successfully but had nothing for this product
    #[error("Product '{0}' not found")]
    NotFound(String),

    /// The payload does not have the expected shape
    #[error("Unexpected product payload: {0}")]
    Decode(#[from] serde_json::Error),
}

impl DataError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, DataError::NotFound(_))
    }
}

/// Loads products from the API, caching responses
#[derive(Debug, Clone)]
pub struct ProductApi {
    client: FetchClient,
    cache: TimedCache,
}

impl ProductApi {
    pub fn new(client: FetchClient, cache: TimedCache) -> Self {
        Self { client, cache }
    }

    /// Generates the cache key for a product detail
    fn detail_cache_key(id: &str) -> String {
        format!("product_{}", id)
    }

    /// Returns a cached value unless it is absent or empty
    ///
    /// An empty list or record is not trusted as real data and triggers a
    /// refetch, same as a missing entry.
    fn cached(&self, key: &str) -> Option<Value> {
        match self.cache.read::<Value>(key) {
            Some(value) if !is_empty(&value) => {
                debug!(key, "cache hit");
                Some(value)
            }
            Some(_) => {
                debug!(key, "cached value is empty, refetching");
                None
            }
            None => {
                debug!(key, "cache miss");
                None
            }
        }
    }

    /// Fetches the product list as raw JSON
    ///
    /// # Returns
    /// * `Ok(Value)` - The cached list if fresh and non-empty, otherwise the API response
    /// * `Err(DataError::Fetch)` - If the request fails (nothing is cached)
    pub async fn get_all(&self) -> Result<Value, DataError> {
        if let Some(cached) = self.cached(PRODUCTS_CACHE_KEY) {
            return Ok(cached);
        }

        let data = self.client.request("/product", RequestOptions::get()).await?;
        self.cache.write(PRODUCTS_CACHE_KEY, &data);
        Ok(data)
    }

    /// Fetches a single product as raw JSON
    ///
    /// # Returns
    /// * `Ok(Value)` - The product record
    /// * `Err(DataError::NotFound)` - The API returned an empty record (not cached)
    /// * `Err(DataError::Fetch)` - If the request fails (nothing is cached)
    pub async fn get_by_id(&self, id: &str) -> Result<Value, DataError> {
        let cache_key = Self::detail_cache_key(id);
        if let Some(cached) = self.cached(&cache_key) {
            return Ok(cached);
        }

        let data = self
            .client
            .request(&format!("/product/{}", id), RequestOptions::get())
            .await?;

        if is_empty(&data) {
            return Err(DataError::NotFound(id.to_string()));
        }

        self.cache.write(&cache_key, &data);
        Ok(data)
    }

    /// Fetches the product list decoded into summaries
    pub async fn list_products(&self) -> Result<Vec<ProductSummary>, DataError> {
        let value = self.get_all().await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Fetches a product decoded into its full record
    pub async fn product(&self, id: &str) -> Result<ProductDetail, DataError> {
        let value = self.get_by_id(id).await?;
        Ok(serde_json::from_value(value)?)
    }
}

/// `null`, `[]`, `{}` and `""` all count as "nothing there"
fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
