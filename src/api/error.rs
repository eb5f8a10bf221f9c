use thiserror::Error;

use super::transport::TransportError;

/// Terminal outcome of a failed request
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with a status that is not worth retrying
    #[error("API error: HTTP status {status}")]
    Http { status: u16 },

    /// The request never got a response
    #[error("Network error: {0}")]
    Network(#[from] TransportError),

    /// Every allowed attempt failed with a transient error
    #[error("Gave up after {attempts} attempt(s): {last}")]
    Exhausted {
        attempts: u32,
        #[source]
        last: Box<FetchError>,
    },

    /// The response succeeded but its body is not valid JSON
    #[error("Failed to parse response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    /// The last HTTP status observed, looking through `Exhausted`
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Http { status } => Some(*status),
            FetchError::Exhausted { last, .. } => last.status(),
            _ => None,
        }
    }

    /// Whether the request failed without any HTTP response
    pub fn is_network(&self) -> bool {
        match self {
            FetchError::Network(_) => true,
            FetchError::Exhausted { last, .. } => last.is_network(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_looks_through_exhausted() {
        let err = FetchError::Exhausted {
            attempts: 3,
            last: Box::new(FetchError::Http { status: 503 }),
        };
        assert_eq!(err.status(), Some(503));
        assert!(!err.is_network());
        assert!(err.to_string().contains("3 attempt"));
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn test_network_error_has_no_status() {
        let err = FetchError::Exhausted {
            attempts: 1,
            last: Box::new(FetchError::Network(TransportError::new("connection refused"))),
        };
        assert_eq!(err.status(), None);
        assert!(err.is_network());
    }
}
