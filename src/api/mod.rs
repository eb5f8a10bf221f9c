//! Resilient HTTP access to the storefront API
//!
//! [`FetchClient`] sends requests through a [`Transport`], classifies failures
//! with a [`RetryPolicy`] and retries transient ones with exponential backoff.

mod client;
mod error;
mod retry;
mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{FetchClient, RequestOptions};
pub use error::FetchError;
pub use retry::{Disposition, RetryPolicy, RETRYABLE_STATUSES};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportError};

pub use reqwest::Method;

/// Base URL of the storefront API
pub const BASE_URL: &str = "https://itx-frontend-test.onrender.com/api";
