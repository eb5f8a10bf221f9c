//! Command-line interface parsing for the storefront
//!
//! Global flags tune the API client and the local store; each of them can also
//! come from a `STOREFRONT_*` environment variable.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Storefront - browse products and add them to your cart
#[derive(Parser, Debug)]
#[command(name = "storefront")]
#[command(about = "Browse the product catalog and manage your cart")]
#[command(version)]
pub struct Cli {
    /// Base URL of the storefront API
    #[arg(long, global = true, env = "STOREFRONT_BASE_URL", value_name = "URL")]
    pub base_url: Option<String>,

    /// Retries after a transient failure (0 disables retrying)
    #[arg(long, global = true, env = "STOREFRONT_RETRIES", value_name = "N")]
    pub retries: Option<u32>,

    /// Delay before the first retry; doubles on each further retry
    #[arg(
        long,
        global = true,
        env = "STOREFRONT_RETRY_DELAY_MS",
        value_name = "MS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub retry_delay_ms: Option<u64>,

    /// Directory for cached responses and the cart counter
    #[arg(long, global = true, env = "STOREFRONT_STORE_DIR", value_name = "DIR")]
    pub store_dir: Option<PathBuf>,

    /// Log cache and retry activity to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List products, optionally filtered by brand or model
    List {
        /// Case-insensitive text to look for in "<brand> <model>"
        #[arg(short, long, value_name = "QUERY")]
        search: Option<String>,
    },
    /// Show full details for one or more products
    Show {
        /// Product ids
        #[arg(required = true, value_name = "ID")]
        ids: Vec<String>,
    },
    /// Add a product to the cart
    ///
    /// Without --color or --storage, the product's first option is used.
    Add {
        /// Product id
        #[arg(value_name = "ID")]
        id: String,
        /// Color option code
        #[arg(long, value_name = "CODE")]
        color: Option<i64>,
        /// Storage option code
        #[arg(long, value_name = "CODE")]
        storage: Option<i64>,
    },
    /// Show how many items have been added to the cart
    Cart,
}
