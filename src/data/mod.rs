//! Core data models for the storefront
//!
//! Typed views of the product payloads served by the API, plus the
//! [`ProductApi`] that fetches them through the cache.

pub mod price;
pub mod product_api;

pub use price::format_price;
pub use product_api::{DataError, ProductApi};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A price as the API sends it: usually a decimal string, sometimes empty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Number(f64),
    Text(String),
}

impl Price {
    /// Numeric value, if the price is present and parses
    pub fn amount(&self) -> Option<f64> {
        match self {
            Price::Number(n) if n.is_finite() => Some(*n),
            Price::Number(_) => None,
            Price::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        }
    }
}

/// An entry of the product list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub price: Option<Price>,
    #[serde(default)]
    pub img_url: Option<String>,
}

impl ProductSummary {
    /// Text matched by product search
    pub fn search_text(&self) -> String {
        format!("{} {}", self.brand, self.model)
    }
}

/// A purchasable variant (color or storage capacity)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOption {
    pub code: i64,
    pub name: String,
}

/// Variants offered for a product
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOptions {
    #[serde(default)]
    pub colors: Vec<ProductOption>,
    #[serde(default)]
    pub storages: Vec<ProductOption>,
}

/// Full product record from `GET /product/{id}`
///
/// Hardware fields are free-form; the API sends some of them as either a
/// string or a list of strings, so they stay as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    pub id: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub price: Option<Price>,
    #[serde(default)]
    pub img_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cpu: Option<Value>,
    #[serde(default)]
    pub ram: Option<Value>,
    #[serde(default)]
    pub os: Option<Value>,
    #[serde(default)]
    pub display_resolution: Option<Value>,
    #[serde(default)]
    pub display_size: Option<Value>,
    #[serde(default)]
    pub battery: Option<Value>,
    #[serde(default)]
    pub primary_camera: Option<Value>,
    // The API misspells this field
    #[serde(default, alias = "secondaryCmera")]
    pub secondary_camera: Option<Value>,
    // Likewise
    #[serde(default, alias = "dimentions")]
    pub dimensions: Option<Value>,
    #[serde(default)]
    pub weight: Option<Value>,
    #[serde(default)]
    pub options: ProductOptions,
}

impl ProductDetail {
    /// Labelled hardware specs that are present, in display order
    pub fn specs(&self) -> Vec<(&'static str, String)> {
        let fields = [
            ("CPU", &self.cpu),
            ("RAM", &self.ram),
            ("OS", &self.os),
            ("Display resolution", &self.display_resolution),
            ("Display size", &self.display_size),
            ("Battery", &self.battery),
            ("Primary camera", &self.primary_camera),
            ("Secondary camera", &self.secondary_camera),
            ("Dimensions", &self.dimensions),
            ("Weight", &self.weight),
        ];

        fields
            .into_iter()
            .filter_map(|(label, value)| {
                value.as_ref().and_then(spec_text).map(|text| (label, text))
            })
            .collect()
    }

    /// Color and storage codes used when the caller does not pick any
    ///
    /// The first option of each kind, or 0 when the product has none.
    pub fn default_selection(&self) -> (i64, i64) {
        let first = |options: &[ProductOption]| options.first().map_or(0, |o| o.code);
        (first(&self.options.colors), first(&self.options.storages))
    }
}

/// Renders a spec value, skipping empty ones
fn spec_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(spec_text)
            .collect::<Vec<_>>()
            .join(", "),
        _ => String::new(),
    };
    (!text.is_empty()).then_some(text)
}
