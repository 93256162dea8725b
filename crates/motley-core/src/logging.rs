//! Logging setup based on `tracing-subscriber`.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info,motley_list=debug";

/// Install a formatted subscriber, honouring `RUST_LOG` when present.
///
/// Calling this more than once is harmless; later calls leave the first
/// subscriber in place.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    install(filter);
}

/// Install a formatted subscriber with an explicit directive string,
/// e.g. `"trace"` or `"warn,motley_list::dispatcher=trace"`.
pub fn init_with_filter(directives: &str) {
    install(EnvFilter::new(directives));
}

fn install(filter: EnvFilter) {
    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_err()
    {
        tracing::debug!("global subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_does_not_panic() {
        init_with_filter("warn");
        init();
    }
}
