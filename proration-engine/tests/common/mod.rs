//! Test helper module for proration-engine integration tests.

#![allow(dead_code)]

use billing_core::config::Config as CoreConfig;
use proration_engine::{format_date, Period, Proration, ProrationConfig};
use std::sync::Once;

static TRACING: Once = Once::new();

/// Install a quiet subscriber once per test binary. `RUST_LOG` still overrides it.
pub fn init_test_tracing() {
    TRACING.call_once(|| {
        let config = ProrationConfig {
            common: CoreConfig {
                log_level: "warn".to_string(),
                log_json: false,
            },
            service_name: "proration-engine-test".to_string(),
            ..ProrationConfig::default()
        };
        config.init_tracing();
    });
}

/// Build a proration from fixture values.
pub fn proration(start: &str, prorate_day: i32, term: u32, period: Period) -> Proration {
    init_test_tracing();
    Proration::new(start, prorate_day, term, period).expect("Fixture start date should parse")
}

pub fn monthly(start: &str, prorate_day: i32) -> Proration {
    proration(start, prorate_day, 1, Period::Month)
}

/// The boundary in ISO-8601 form, as billing code stores it.
pub fn boundary(proration: &Proration) -> Option<String> {
    proration.prorate_date().map(|date| format_date(&date))
}

/// Round to the 4 decimal places prices are compared at.
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
