//! Configuration module for proration-engine.

use billing_core::config as core_config;
use billing_core::error::AppError;
use chrono_tz::Tz;
use std::env;

use crate::models::{Period, DEFAULT_PRORATABLE_PERIODS};

#[derive(Debug, Clone)]
pub struct ProrationConfig {
    pub common: core_config::Config,
    pub service_name: String,
    /// Zone applied to every `Proration` built with this config.
    pub time_zone: Option<Tz>,
    pub proratable_periods: Vec<Period>,
}

impl Default for ProrationConfig {
    fn default() -> Self {
        Self {
            common: core_config::Config::default(),
            service_name: "proration-engine".to_string(),
            time_zone: None,
            proratable_periods: DEFAULT_PRORATABLE_PERIODS.to_vec(),
        }
    }
}

impl ProrationConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        Self::with_common(common)
    }

    /// Build from an already loaded core config, reading the engine settings from the environment.
    pub fn with_common(common: core_config::Config) -> Result<Self, AppError> {
        let time_zone = match env::var("PRORATION_TIME_ZONE") {
            Ok(name) if !name.trim().is_empty() => Some(parse_time_zone(&name)?),
            _ => None,
        };

        let proratable_periods = match env::var("PRORATION_PERIODS") {
            Ok(list) => parse_periods(&list)?,
            Err(_) => DEFAULT_PRORATABLE_PERIODS.to_vec(),
        };

        Ok(Self {
            common,
            service_name: env::var("SERVICE_NAME")
                .unwrap_or_else(|_| "proration-engine".to_string()),
            time_zone,
            proratable_periods,
        })
    }
}

impl ProrationConfig {
    /// Install the global subscriber under this service's name and log settings.
    ///
    /// Returns `false` when a subscriber was already installed.
    pub fn init_tracing(&self) -> bool {
        billing_core::observability::init_tracing(
            &self.service_name,
            &self.common.log_level,
            self.common.log_json,
        )
    }
}

pub fn parse_time_zone(name: &str) -> Result<Tz, AppError> {
    name.trim().parse::<Tz>().map_err(|_| {
        AppError::ConfigError(anyhow::anyhow!(
            "PRORATION_TIME_ZONE is not a known IANA zone: {}",
            name
        ))
    })
}

/// Parse a comma separated period list. Unknown names are rejected rather than
/// silently mapped to `onetime`.
pub fn parse_periods(list: &str) -> Result<Vec<Period>, AppError> {
    let mut periods = Vec::new();
    for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let period = Period::parse(name).ok_or_else(|| {
            AppError::ConfigError(anyhow::anyhow!(
                "PRORATION_PERIODS contains an unknown period: {}",
                name
            ))
        })?;
        if !periods.contains(&period) {
            periods.push(period);
        }
    }
    Ok(periods)
}
