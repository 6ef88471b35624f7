use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `log_level`. Returns `false` when a
/// subscriber was already installed, which is expected when several tests
/// share a process.
pub fn init_tracing(service_name: &str, log_level: &str, json: bool) -> bool {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_file(true)
                    .with_line_number(true)
                    .json()
                    .flatten_event(true),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_file(true)
                    .with_line_number(true)
                    .pretty(),
            )
            .try_init()
    };

    match result {
        Ok(()) => {
            tracing::debug!(service_name, log_level, json, "Tracing initialized");
            true
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_rejected_without_panicking() {
        init_tracing("billing-core-test", "debug", false);
        assert!(!init_tracing("billing-core-test", "debug", true));
    }
}
