//! Fetch client with retry and exponential backoff
//!
//! Every request goes to `base_url + path`. Transport failures and retryable
//! statuses are retried up to the policy's budget, sleeping
//! `base_delay * 2^i` before retry `i`; any other non-2xx status fails at once.

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::error::FetchError;
use super::retry::{Disposition, RetryPolicy};
use super::transport::{HttpRequest, ReqwestTransport, Transport};
use super::BASE_URL;

/// Header sent with every request unless the caller overrides it
const DEFAULT_CONTENT_TYPE: (&str, &str) = ("Content-Type", "application/json");

/// Per-request settings
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// HTTP method, GET when unset
    pub method: Option<Method>,
    /// JSON body
    pub body: Option<Value>,
    /// Extra headers, taking precedence over the defaults
    pub headers: Vec<(String, String)>,
    /// Overrides the policy's retry count
    pub retries: Option<u32>,
    /// Overrides the policy's base delay
    pub retry_delay: Option<Duration>,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post(body: Value) -> Self {
        Self {
            method: Some(Method::POST),
            body: Some(body),
            ..Self::default()
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = Some(retries);
        self
    }

    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = Some(delay);
        self
    }
}

/// Client for the storefront API
#[derive(Clone)]
pub struct FetchClient {
    transport: Arc<dyn Transport>,
    base_url: String,
    policy: RetryPolicy,
}

impl std::fmt::Debug for FetchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchClient")
            .field("base_url", &self.base_url)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl Default for FetchClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchClient {
    /// Create a client for [`BASE_URL`] with the default retry policy
    pub fn new() -> Self {
        Self::with_transport(Arc::new(ReqwestTransport::new()))
    }

    /// Create a client sending through a custom transport
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            base_url: BASE_URL.to_string(),
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Sends a request and returns the parsed JSON body
    ///
    /// # Arguments
    /// * `path` - Appended verbatim to the base URL (e.g. "/product/1")
    /// * `options` - Method, body, headers and retry overrides
    ///
    /// # Returns
    /// * `Ok(Value)` - The body exactly as the server sent it (`null` if empty)
    /// * `Err(FetchError::Http)` - A non-retryable status, on its first occurrence
    /// * `Err(FetchError::Exhausted)` - Retryable failures used up the budget
    /// * `Err(FetchError::Decode)` - A 2xx response whose body is not JSON
    pub async fn request(&self, path: &str, options: RequestOptions) -> Result<Value, FetchError> {
        let policy = self.policy.with_overrides(options.retries, options.retry_delay);
        let request = self.build_request(path, options);

        let mut retry_index: u32 = 0;
        loop {
            let failure = match self.transport.send(&request).await {
                Ok(response) if response.is_success() => {
                    debug!(path, status = response.status, "request succeeded");
                    return parse_body(&response.body);
                }
                Ok(response) => {
                    let error = FetchError::Http {
                        status: response.status,
                    };
                    if policy.classify(response.status) == Disposition::Fatal {
                        return Err(error);
                    }
                    error
                }
                Err(e) => FetchError::Network(e),
            };

            if retry_index >= policy.max_retries {
                return Err(FetchError::Exhausted {
                    attempts: retry_index + 1,
                    last: Box::new(failure),
                });
            }

            let delay = policy.delay_for(retry_index);
            warn!(
                path,
                retry = retry_index + 1,
                max_retries = policy.max_retries,
                delay_ms = delay.as_millis() as u64,
                error = %failure,
                "request failed, retrying"
            );
            tokio::time::sleep(delay).await;
            retry_index += 1;
        }
    }

    /// Sends a request and decodes the body into `T`
    pub async fn request_as<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, FetchError> {
        let value = self.request(path, options).await?;
        Ok(serde_json::from_value(value)?)
    }

    fn build_request(&self, path: &str, options: RequestOptions) -> HttpRequest {
        let mut headers = vec![(
            DEFAULT_CONTENT_TYPE.0.to_string(),
            DEFAULT_CONTENT_TYPE.1.to_string(),
        )];
        for (name, value) in options.headers {
            headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
            headers.push((name, value));
        }

        HttpRequest {
            method: options.method.unwrap_or(Method::GET),
            url: format!("{}{}", self.base_url, path),
            headers,
            body: options.body.map(|body| body.to_string()),
        }
    }
}

/// Parses a success body, treating an empty one as JSON `null`
fn parse_body(body: &str) -> Result<Value, FetchError> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(body)?)
}
