//! Shopping cart counter
//!
//! The cart itself lives on the server; locally we only keep how many items
//! were added, persisted under `cartCount` so it survives restarts.

use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

use crate::api::{FetchClient, FetchError, RequestOptions};
use crate::store::{KeyValueStore, StoreError};

/// Store key of the persisted counter
pub const CART_COUNT_KEY: &str = "cartCount";

/// Errors that can occur when adding to the cart
#[derive(Debug, Error)]
pub enum CartError {
    /// The API rejected the request or could not be reached
    #[error("Failed to add product to cart: {0}")]
    Fetch(#[from] FetchError),

    /// The item was added but the new count could not be saved
    #[error("Failed to save cart count: {0}")]
    Store(#[from] StoreError),
}

/// Adds products to the remote cart and tracks the local item count
#[derive(Clone)]
pub struct CartService {
    client: FetchClient,
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for CartService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartService")
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

impl CartService {
    pub fn new(client: FetchClient, store: Arc<dyn KeyValueStore>) -> Self {
        Self { client, store }
    }

    /// Current number of items added, 0 if never set or unreadable
    pub fn count(&self) -> u64 {
        self.store
            .get(CART_COUNT_KEY)
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(0)
    }

    /// Adds a product variant to the cart
    ///
    /// Sends `POST /cart` and, only if it succeeds, increments the persisted
    /// counter by one.
    ///
    /// # Returns
    /// * `Ok(u64)` - The new item count
    /// * `Err(CartError::Fetch)` - The request failed; the counter is unchanged
    pub async fn add_to_cart(
        &self,
        id: &str,
        color_code: i64,
        storage_code: i64,
    ) -> Result<u64, CartError> {
        let body = json!({
            "id": id,
            "colorCode": color_code,
            "storageCode": storage_code,
        });

        if let Err(e) = self.client.request("/cart", RequestOptions::post(body)).await {
            error!(id, error = %e, "error adding to cart");
            return Err(e.into());
        }

        let count = self.count().saturating_add(1);
        self.store.set(CART_COUNT_KEY, &count.to_string())?;
        info!(id, color_code, storage_code, count, "added to cart");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::ScriptedTransport;
    use crate::api::{HttpResponse, Method, RetryPolicy};
    use crate::store::{FileStore, MemoryStore};
    use std::time::Duration;
    use tempfile::TempDir;

    fn service(
        transport: Arc<ScriptedTransport>,
        store: Arc<dyn KeyValueStore>,
    ) -> CartService {
        let policy = RetryPolicy {
            base_delay: Duration::from_millis(1),
            ..RetryPolicy::default()
        };
        CartService::new(FetchClient::with_transport(transport).with_policy(policy), store)
    }

    #[test]
    fn test_count_defaults_to_zero() {
        let cart = service(ScriptedTransport::new(vec![]), Arc::new(MemoryStore::new()));
        assert_eq!(cart.count(), 0);
    }

    #[test]
    fn test_malformed_count_reads_as_zero() {
        let store = Arc::new(MemoryStore::new());
        store.set(CART_COUNT_KEY, "lots").unwrap();
        let cart = service(ScriptedTransport::new(vec![]), store);
        assert_eq!(cart.count(), 0);
    }

    #[tokio::test]
    async fn test_add_posts_variant_and_increments() {
        let transport = ScriptedTransport::new(vec![Ok(HttpResponse::new(200, r#"{"count":1}"#))]);
        let store = Arc::new(MemoryStore::new());
        let cart = service(transport.clone(), store.clone());

        let count = cart.add_to_cart("1", 1000, 2000).await.unwrap();

        assert_eq!(count, 1);
        assert_eq!(store.get(CART_COUNT_KEY).as_deref(), Some("1"));

        let request = &transport.requests()[0];
        assert_eq!(request.method, Method::POST);
        assert!(request.url.ends_with("/cart"));
        let body: serde_json::Value =
            serde_json::from_str(request.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"id": "1", "colorCode": 1000, "storageCode": 2000}));
    }

    #[tokio::test]
    async fn test_failed_add_leaves_count_unchanged() {
        let transport = ScriptedTransport::new(vec![
            Ok(HttpResponse::new(200, "{}")),
            Ok(HttpResponse::new(400, "")),
        ]);
        let cart = service(transport, Arc::new(MemoryStore::new()));

        cart.add_to_cart("1", 1000, 2000).await.unwrap();
        let err = cart.add_to_cart("1", 1000, 2000).await.unwrap_err();

        assert!(matches!(err, CartError::Fetch(FetchError::Http { status: 400 })));
        assert_eq!(cart.count(), 1);
    }

    #[tokio::test]
    async fn test_count_survives_restart() {
        let temp_dir = TempDir::new().unwrap();
        let transport = ScriptedTransport::repeating(Ok(HttpResponse::new(200, "{}")));

        let first = service(
            transport.clone(),
            Arc::new(FileStore::with_dir(temp_dir.path().to_path_buf())),
        );
        first.add_to_cart("a", 1, 2).await.unwrap();
        first.add_to_cart("b", 1, 2).await.unwrap();

        let second = service(
            transport,
            Arc::new(FileStore::with_dir(temp_dir.path().to_path_buf())),
        );
        assert_eq!(second.count(), 2);
    }
}
