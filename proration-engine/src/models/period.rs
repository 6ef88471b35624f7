//! Billing period model.

use serde::{Deserialize, Serialize};

/// Unit of a recurring billing term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Day,
    Week,
    Month,
    Year,
    #[serde(alias = "one_time", alias = "one-time")]
    Onetime,
}

/// Periods prorated when no explicit set is configured.
pub const DEFAULT_PRORATABLE_PERIODS: [Period; 2] = [Period::Month, Period::Year];

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Day => "day",
            Period::Week => "week",
            Period::Month => "month",
            Period::Year => "year",
            Period::Onetime => "onetime",
        }
    }

    /// Strict, case-insensitive parse. `None` for a name that is not a period.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Some(Period::Day),
            "week" => Some(Period::Week),
            "month" => Some(Period::Month),
            "year" => Some(Period::Year),
            "onetime" | "one_time" | "one-time" => Some(Period::Onetime),
            _ => None,
        }
    }

    /// Unknown values map to `Onetime`, which is never proratable by default.
    pub fn from_string(s: &str) -> Self {
        Self::parse(s).unwrap_or(Period::Onetime)
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
