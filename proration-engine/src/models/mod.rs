//! Domain models for proration-engine.

mod date_input;
mod period;

pub use date_input::{parse_date, DateInput};
pub use period::{Period, DEFAULT_PRORATABLE_PERIODS};
