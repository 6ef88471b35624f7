//! Proration Engine - date-based proration of recurring billing periods.
//!
//! Given a start date, a prorate day, a term and a period, the engine finds the
//! next prorate boundary, counts the days up to it and prices the partial period.

pub mod calendar;
pub mod charges;
pub mod config;
pub mod error;
pub mod models;
pub mod proration;

pub use charges::{plan_change, prorated_charge, PlanChange, ProrationCharge};
pub use config::ProrationConfig;
pub use error::{ProrationError, Result};
pub use models::{DateInput, Period, DEFAULT_PRORATABLE_PERIODS};
pub use proration::{format_date, Proration};
