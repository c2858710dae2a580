//! Logging initialization.
//!
//! Uses the `tracing` ecosystem with either human-readable or JSON output.
//! Log output goes to stderr; stdout is reserved for the progress lines
//! rendered by [`crate::output`].

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Filter used when `RUST_LOG` is not set.
///
/// Only this crate's events are raised to debug; dependencies stay at warn.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "warn,photo_squeeze=debug"
    } else {
        "warn,photo_squeeze=info"
    }
}

/// Initialize the global subscriber. `RUST_LOG` overrides the level.
pub fn init(verbose: bool, json_format: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_raises_crate_level_only() {
        assert_eq!(default_directive(true), "warn,photo_squeeze=debug");
        assert_eq!(default_directive(false), "warn,photo_squeeze=info");
    }

    #[test]
    fn directives_parse() {
        for verbose in [true, false] {
            assert!(EnvFilter::try_new(default_directive(verbose)).is_ok());
        }
    }
}
