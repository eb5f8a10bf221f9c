//! Log output setup
//!
//! Logs go to stderr so they never mix with command output. `RUST_LOG`, when
//! set, takes precedence over the level picked from `--verbose`.

use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset
fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "storefront=debug"
    } else {
        "storefront=warn"
    }
}

/// Installs the global subscriber
///
/// Fails if a subscriber was already installed in this process.
pub fn init(verbose: bool) -> Result<(), TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(false), "storefront=warn");
        assert_eq!(default_directive(true), "storefront=debug");
    }
}
