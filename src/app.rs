//! Application wiring and command execution
//!
//! `App` owns the product and cart services built from a [`Config`] and turns
//! each CLI [`Command`] into lines for stdout and stderr.

use futures::future::join_all;
use std::sync::Arc;
use tracing::warn;

use crate::api::{FetchClient, ReqwestTransport, Transport};
use crate::cache::TimedCache;
use crate::cart::CartService;
use crate::cli::Command;
use crate::config::Config;
use crate::data::{format_price, DataError, ProductApi, ProductDetail, ProductSummary};
use crate::search;
use crate::store::{FileStore, KeyValueStore, MemoryStore};

/// Shown when products cannot be loaded
const RETRY_LATER_MESSAGE: &str = "Please try again later.";

/// What a command produced
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Report {
    /// Lines for stdout
    pub output: Vec<String>,
    /// Lines for stderr
    pub errors: Vec<String>,
}

impl Report {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    fn line(&mut self, line: impl Into<String>) {
        self.output.push(line.into());
    }

    fn error(&mut self, line: impl Into<String>) {
        self.errors.push(line.into());
    }
}

/// Main application state
#[derive(Debug, Clone)]
pub struct App {
    products: ProductApi,
    cart: CartService,
}

impl App {
    /// Builds the application from configuration using the real HTTP transport
    pub fn from_config(config: &Config) -> Self {
        let store: Arc<dyn KeyValueStore> = match &config.store_dir {
            Some(dir) => Arc::new(FileStore::with_dir(dir.clone())),
            None => match FileStore::new() {
                Some(store) => Arc::new(store),
                None => {
                    warn!("no data directory available, nothing will persist");
                    Arc::new(MemoryStore::new())
                }
            },
        };
        Self::with_transport(config, Arc::new(ReqwestTransport::new()), store)
    }

    /// Builds the application around a custom transport and store
    pub fn with_transport(
        config: &Config,
        transport: Arc<dyn Transport>,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        let client = FetchClient::with_transport(transport)
            .with_base_url(config.base_url.clone())
            .with_policy(config.retry.clone());
        let cache = TimedCache::new(store.clone()).with_ttl(config.cache_ttl);

        Self {
            products: ProductApi::new(client.clone(), cache),
            cart: CartService::new(client, store),
        }
    }

    pub fn products(&self) -> &ProductApi {
        &self.products
    }

    pub fn cart(&self) -> &CartService {
        &self.cart
    }

    /// Runs a command to completion
    pub async fn run(&self, command: &Command) -> Report {
        match command {
            Command::List { search } => self.list(search.as_deref()).await,
            Command::Show { ids } => self.show(ids).await,
            Command::Add { id, color, storage } => self.add(id, *color, *storage).await,
            Command::Cart => {
                let mut report = Report::default();
                report.line(format!("Cart: {} item(s)", self.cart.count()));
                report
            }
        }
    }

    async fn list(&self, query: Option<&str>) -> Report {
        let mut report = Report::default();

        let products = match self.products.list_products().await {
            Ok(products) => products,
            Err(e) => {
                warn!(error = %e, "failed to load products");
                report.error(format!("Could not load products. {}", RETRY_LATER_MESSAGE));
                return report;
            }
        };

        let matches = search::filter(&products, query.unwrap_or(""), ProductSummary::search_text);
        if matches.is_empty() {
            report.line("No products found.");
        }
        for product in matches {
            report.line(render_summary(product));
        }
        report
    }

    async fn show(&self, ids: &[String]) -> Report {
        let mut report = Report::default();

        let results = join_all(ids.iter().map(|id| self.products.product(id))).await;
        for (index, (id, result)) in ids.iter().zip(results).enumerate() {
            match result {
                Ok(detail) => {
                    if index > 0 {
                        report.line("");
                    }
                    report.output.extend(render_detail(&detail));
                }
                Err(e) => report.error(detail_error_message(id, &e)),
            }
        }
        report
    }

    async fn add(&self, id: &str, color: Option<i64>, storage: Option<i64>) -> Report {
        let mut report = Report::default();

        let (color, storage) = match (color, storage) {
            (Some(color), Some(storage)) => (color, storage),
            _ => match self.products.product(id).await {
                Ok(detail) => {
                    let (default_color, default_storage) = detail.default_selection();
                    (color.unwrap_or(default_color), storage.unwrap_or(default_storage))
                }
                Err(e) => {
                    report.error(detail_error_message(id, &e));
                    return report;
                }
            },
        };

        match self.cart.add_to_cart(id, color, storage).await {
            Ok(count) => report.line(format!("Added to cart. Cart: {} item(s)", count)),
            Err(e) => {
                report.error(format!("Could not add the product to the cart: {}", e));
            }
        }
        report
    }
}

/// User-facing message for a failed product lookup
///
/// A product the API does not know reads differently from a failed request.
fn detail_error_message(id: &str, err: &DataError) -> String {
    if err.is_not_found() {
        format!("Product '{}' not found.", id)
    } else {
        warn!(id, error = %err, "failed to load product");
        format!("Could not load product '{}'. {}", id, RETRY_LATER_MESSAGE)
    }
}

/// One list line: id, brand and model, price
pub fn render_summary(product: &ProductSummary) -> String {
    format!(
        "{}  {} {}  {}",
        product.id,
        product.brand,
        product.model,
        format_price(product.price.as_ref())
    )
}

/// Detail block: header, specs, then the available options
pub fn render_detail(detail: &ProductDetail) -> Vec<String> {
    let mut lines = vec![
        format!("{} {}", detail.brand, detail.model),
        format!("Price: {}", format_price(detail.price.as_ref())),
        format!("Id: {}", detail.id),
    ];

    if let Some(description) = detail.description.as_deref().filter(|d| !d.trim().is_empty()) {
        lines.push(description.trim().to_string());
    }

    for (label, value) in detail.specs() {
        lines.push(format!("{}: {}", label, value));
    }

    let options = &detail.options;
    if options.colors.is_empty() && options.storages.is_empty() {
        lines.push("No configuration options".to_string());
    }
    for (label, choices) in [("Colors", &options.colors), ("Storage", &options.storages)] {
        if !choices.is_empty() {
            let listed: Vec<String> = choices
                .iter()
                .map(|o| format!("{} ({})", o.name, o.code))
                .collect();
            lines.push(format!("{}: {}", label, listed.join(", ")));
        }
    }

    lines
}
