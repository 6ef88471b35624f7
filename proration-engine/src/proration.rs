//! Proration engine.
//!
//! A [`Proration`] describes one billing cycle: where it starts, which day the
//! recurring charge is anchored to, and how long a full cycle is (`term` x
//! `period`). From that it derives the next prorate boundary, the number of days
//! up to it and the share of the cycle price owed for those days.
//!
//! A configuration that cannot be prorated is not an error. It yields `None`,
//! `0` or `0.0` and callers fall back to billing the full amount.
//!
//! # Example
//!
//! ```
//! use proration_engine::{Period, Proration};
//!
//! # fn example() -> proration_engine::Result<()> {
//! let proration = Proration::new("2015-01-31T12:00:00-08:00", 1, 1, Period::Month)?;
//!
//! assert!(proration.can_prorate());
//! assert_eq!(proration.prorate_days(), 1);
//! assert!((proration.prorate_price(100.0) - 3.2258).abs() < 1e-4);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

use std::collections::BTreeSet;

use chrono::{
    DateTime, Datelike, Days, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, Timelike,
};
use chrono_tz::Tz;

use crate::calendar::{clamped_date, days_between, shift_months, Anchor, LocalZone};
use crate::config::ProrationConfig;
use crate::error::{ProrationError, Result};
use crate::models::{DateInput, Period, DEFAULT_PRORATABLE_PERIODS};

/// Largest day-of-month a prorate day can name.
const MAX_PRORATE_DAY: i32 = 31;

/// Starts after local noon do not count their own day.
const NOON_SECONDS: u32 = 12 * 3600;

/// Calculator for one billing cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct Proration {
    start_date: Option<DateTime<FixedOffset>>,
    prorate_day: i32,
    term: u32,
    period: Period,
    time_zone: Option<Tz>,
    prorate_date: Option<DateTime<FixedOffset>>,
    proratable_periods: BTreeSet<Period>,
}

/// A resolved boundary together with the local start it was computed from.
#[derive(Debug, Clone, Copy)]
struct Boundary {
    start_local: NaiveDateTime,
    date: NaiveDate,
    instant: DateTime<FixedOffset>,
    anchor: Anchor,
}

impl Proration {
    /// Build a calculator.
    ///
    /// Only a malformed date string fails. Every other value is stored as given
    /// and checked when something is computed.
    ///
    /// # Errors
    ///
    /// Returns [`ProrationError::DateParse`] if `start_date` is text that is not
    /// an ISO-8601 date-time with an offset.
    pub fn new(
        start_date: impl Into<DateInput>,
        prorate_day: i32,
        term: u32,
        period: Period,
    ) -> Result<Self> {
        let start_date = start_date.into().resolve()?;

        Ok(Self {
            start_date,
            prorate_day,
            term,
            period,
            time_zone: None,
            prorate_date: None,
            proratable_periods: DEFAULT_PRORATABLE_PERIODS.into_iter().collect(),
        })
    }

    pub fn with_time_zone(mut self, time_zone: Tz) -> Self {
        self.time_zone = Some(time_zone);
        self
    }

    /// # Errors
    ///
    /// Returns [`ProrationError::UnknownTimeZone`] for a name that is not in the IANA database.
    pub fn with_time_zone_name(self, name: &str) -> Result<Self> {
        let time_zone = name
            .parse::<Tz>()
            .map_err(|_| ProrationError::UnknownTimeZone(name.to_string()))?;
        Ok(self.with_time_zone(time_zone))
    }

    /// Compute the boundary from this date instead of from the prorate day.
    ///
    /// A non-date value clears any previous override.
    ///
    /// # Errors
    ///
    /// Returns [`ProrationError::DateParse`] for a malformed date string.
    pub fn with_prorate_date(mut self, prorate_date: impl Into<DateInput>) -> Result<Self> {
        self.prorate_date = prorate_date.into().resolve()?;
        Ok(self)
    }

    pub fn with_proratable_periods(mut self, periods: impl IntoIterator<Item = Period>) -> Self {
        self.proratable_periods = periods.into_iter().collect();
        self
    }

    /// Apply the configured zone (if any) and proratable periods.
    pub fn with_config(self, config: &ProrationConfig) -> Self {
        let proration = self.with_proratable_periods(config.proratable_periods.iter().copied());
        match config.time_zone {
            Some(time_zone) => proration.with_time_zone(time_zone),
            None => proration,
        }
    }

    pub fn start_date(&self) -> Option<DateTime<FixedOffset>> {
        self.start_date
    }

    pub fn prorate_day(&self) -> i32 {
        self.prorate_day
    }

    pub fn term(&self) -> u32 {
        self.term
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn time_zone(&self) -> Option<Tz> {
        self.time_zone
    }

    pub fn override_date(&self) -> Option<DateTime<FixedOffset>> {
        self.prorate_date
    }

    pub fn proratable_periods(&self) -> &BTreeSet<Period> {
        &self.proratable_periods
    }

    /// Next boundary: from the override date when one is set, otherwise from the prorate day.
    pub fn prorate_date(&self) -> Option<DateTime<FixedOffset>> {
        if self.prorate_date.is_some() {
            self.prorate_date_from_date()
        } else {
            self.prorate_date_from_day()
        }
    }

    /// Next occurrence of the prorate day after the start date.
    ///
    /// Yearly periods use the same day-of-month rule as monthly ones: the boundary
    /// is the next occurrence of that day in any month, not a date a whole year
    /// out. A yearly plan started on June 15 with prorate day 1 is prorated for
    /// 16 days of a 365-day cycle. Use [`Proration::with_prorate_date`] to anchor
    /// a yearly plan to a month and day.
    ///
    /// Daily and weekly periods only get a boundary that falls within one cycle
    /// of the start date.
    pub fn prorate_date_from_day(&self) -> Option<DateTime<FixedOffset>> {
        self.day_anchor()
            .and_then(|anchor| self.boundary_for(anchor))
            .map(|boundary| boundary.instant)
    }

    /// Next occurrence of the override date's day (month and day for yearly
    /// periods) after the start date.
    pub fn prorate_date_from_date(&self) -> Option<DateTime<FixedOffset>> {
        self.date_anchor()
            .and_then(|anchor| self.boundary_for(anchor))
            .map(|boundary| boundary.instant)
    }

    /// Whether a non-empty partial period exists.
    pub fn can_prorate(&self) -> bool {
        self.prorated().is_some()
    }

    /// Days from the start date to the boundary.
    ///
    /// Counted in calendar days between local dates. The boundary is always a
    /// local midnight, so a start at or before local noon counts its own day and
    /// a start after noon does not.
    pub fn prorate_days(&self) -> i64 {
        self.prorated().map_or(0, |boundary| count_days(&boundary))
    }

    /// Length in days of the full `term` x `period` cycle ending at the boundary.
    ///
    /// `None` for one-time periods, which have no cycle.
    pub fn cycle_days(&self) -> Option<i64> {
        let boundary = self.prorated()?;
        let cycle_start = self.cycle_start(&boundary)?;
        Some(days_between(cycle_start, boundary.date))
    }

    /// Share of the full cycle being prorated.
    pub fn proration_factor(&self) -> Option<f64> {
        self.day_counts()
            .map(|(days, cycle_days)| days as f64 / cycle_days as f64)
    }

    /// Price owed for the prorated days. `0.0` whenever proration does not apply.
    #[tracing::instrument(
        level = "trace",
        skip(self),
        fields(period = %self.period, term = self.term)
    )]
    pub fn prorate_price(&self, price: f64) -> f64 {
        match self.day_counts() {
            Some((days, cycle_days)) => {
                let prorated = price * days as f64 / cycle_days as f64;
                tracing::trace!(days, cycle_days, prorated, "Prorated price");
                prorated
            }
            None => 0.0,
        }
    }

    /// `(prorate_days, cycle_days)` when a positive-length cycle exists.
    pub(crate) fn day_counts(&self) -> Option<(i64, i64)> {
        let boundary = self.prorated()?;
        let cycle_start = self.cycle_start(&boundary)?;
        let cycle_days = days_between(cycle_start, boundary.date);
        if cycle_days <= 0 {
            tracing::debug!(cycle_days, term = self.term, "Empty billing cycle");
            return None;
        }
        Some((count_days(&boundary), cycle_days))
    }

    /// The boundary, gated on every condition `can_prorate` requires.
    fn prorated(&self) -> Option<Boundary> {
        if self.prorate_day <= 0 {
            tracing::debug!(prorate_day = self.prorate_day, "Prorate day is not positive");
            return None;
        }
        let anchor = if self.prorate_date.is_some() {
            self.date_anchor()
        } else {
            self.day_anchor()
        };
        anchor.and_then(|anchor| self.boundary_for(anchor))
    }

    fn day_anchor(&self) -> Option<Anchor> {
        if !(1..=MAX_PRORATE_DAY).contains(&self.prorate_day) {
            tracing::debug!(prorate_day = self.prorate_day, "Prorate day out of range");
            return None;
        }
        u32::try_from(self.prorate_day).ok().map(Anchor::DayOfMonth)
    }

    fn date_anchor(&self) -> Option<Anchor> {
        let prorate_date = self.prorate_date?;
        let start = self.start_date?;
        let local = self.zone_for(&start).localize(&prorate_date).date();

        Some(match self.period {
            Period::Year => Anchor::DayOfYear {
                month: local.month(),
                day: local.day(),
            },
            _ => Anchor::DayOfMonth(local.day()),
        })
    }

    fn boundary_for(&self, anchor: Anchor) -> Option<Boundary> {
        if !self.proratable_periods.contains(&self.period) {
            tracing::debug!(period = %self.period, "Period is not proratable");
            return None;
        }
        let Some(start) = self.start_date else {
            tracing::debug!("No start date to prorate from");
            return None;
        };

        let zone = self.zone_for(&start);
        let start_local = zone.localize(&start);
        let date = anchor.next_after(start_local.date())?;
        if let Some(span) = self.fixed_cycle_days() {
            if days_between(start_local.date(), date) > span {
                tracing::debug!(
                    %date,
                    span,
                    period = %self.period,
                    "Boundary lies beyond one cycle"
                );
                return None;
            }
        }
        let instant = zone.midnight(date)?;

        tracing::trace!(
            start = %start,
            boundary = %instant,
            ?anchor,
            "Resolved prorate boundary"
        );

        Some(Boundary {
            start_local,
            date,
            instant,
            anchor,
        })
    }

    fn cycle_start(&self, boundary: &Boundary) -> Option<NaiveDate> {
        let term = i32::try_from(self.term).ok()?;
        let date = boundary.date;

        match self.period {
            Period::Month => {
                let (year, month) = shift_months(date.year(), date.month(), -term)?;
                clamped_date(year, month, boundary.anchor.day())
            }
            Period::Year => clamped_date(
                date.year().checked_sub(term)?,
                date.month(),
                boundary.anchor.day(),
            ),
            Period::Day | Period::Week => {
                let span = u64::try_from(self.fixed_cycle_days()?).ok()?;
                date.checked_sub_days(Days::new(span))
            }
            Period::Onetime => None,
        }
    }

    /// Cycle length for periods measured in a fixed number of days.
    fn fixed_cycle_days(&self) -> Option<i64> {
        let term = i64::from(self.term);
        match self.period {
            Period::Day => Some(term),
            Period::Week => Some(term * 7),
            Period::Month | Period::Year | Period::Onetime => None,
        }
    }

    /// Local wall-clock rules: the configured zone, else the start date's own offset.
    fn zone_for(&self, start: &DateTime<FixedOffset>) -> LocalZone {
        match self.time_zone {
            Some(time_zone) => LocalZone::Named(time_zone),
            None => LocalZone::Fixed(*start.offset()),
        }
    }
}

fn count_days(boundary: &Boundary) -> i64 {
    let time = boundary.start_local.time();
    let after_noon = (time.num_seconds_from_midnight(), time.nanosecond()) > (NOON_SECONDS, 0);

    let mut days = days_between(boundary.start_local.date(), boundary.date);
    if after_noon {
        days -= 1;
    }
    days.max(0)
}

/// ISO-8601 with an explicit offset, e.g. `2015-02-01T00:00:00-08:00`.
pub fn format_date(date: &DateTime<FixedOffset>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, false)
}
