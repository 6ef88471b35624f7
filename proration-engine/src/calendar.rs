//! Calendar arithmetic on local wall-clock dates.
//!
//! Everything here works on `NaiveDate` in the effective zone. Instants are only
//! produced at the end, by [`LocalZone::midnight`].

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, Months, NaiveDate, NaiveDateTime, Offset,
    TimeZone,
};
use chrono_tz::Tz;

/// Upper bound on the length of a DST gap we step over when midnight does not exist.
const MAX_GAP_HOURS: u32 = 3;

/// Length of the month, or `0` when `(year, month)` is not a valid month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return 0;
    };
    first
        .checked_add_months(Months::new(1))
        .and_then(|next| u32::try_from(days_between(first, next)).ok())
        .unwrap_or(0)
}

/// The given day in the given month, clamped to the month's last day.
pub fn clamped_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let last = days_in_month(year, month);
    if last == 0 || day == 0 {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day.min(last))
}

/// Move a (year, month) pair by `delta` months. `None` on overflow.
pub fn shift_months(year: i32, month: u32, delta: i32) -> Option<(i32, u32)> {
    let index = year
        .checked_mul(12)?
        .checked_add(i32::try_from(month).ok()? - 1)?
        .checked_add(delta)?;
    Some((index.div_euclid(12), index.rem_euclid(12) as u32 + 1))
}

/// Whole calendar days from `from` to `to`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

/// Where a recurring boundary lands on the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Same day every month.
    DayOfMonth(u32),
    /// Same month and day every year.
    DayOfYear { month: u32, day: u32 },
}

impl Anchor {
    pub fn day(&self) -> u32 {
        match self {
            Anchor::DayOfMonth(day) => *day,
            Anchor::DayOfYear { day, .. } => *day,
        }
    }

    /// First occurrence strictly after `start`.
    ///
    /// `None` when `start` is itself an occurrence, since there is nothing to prorate.
    pub fn next_after(&self, start: NaiveDate) -> Option<NaiveDate> {
        match *self {
            Anchor::DayOfMonth(day) => {
                let current = clamped_date(start.year(), start.month(), day)?;
                if current == start {
                    return None;
                }
                if current > start {
                    return Some(current);
                }
                let (year, month) = shift_months(start.year(), start.month(), 1)?;
                clamped_date(year, month, day)
            }
            Anchor::DayOfYear { month, day } => {
                let current = clamped_date(start.year(), month, day)?;
                if current == start {
                    return None;
                }
                if current > start {
                    return Some(current);
                }
                clamped_date(start.year() + 1, month, day)
            }
        }
    }
}

/// The zone in which local midnight is evaluated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocalZone {
    Fixed(FixedOffset),
    Named(Tz),
}

impl LocalZone {
    pub fn localize(&self, instant: &DateTime<FixedOffset>) -> NaiveDateTime {
        match self {
            LocalZone::Fixed(offset) => instant.with_timezone(offset).naive_local(),
            LocalZone::Named(tz) => instant.with_timezone(tz).naive_local(),
        }
    }

    /// Local midnight of `date` as an instant carrying the offset in effect that day.
    ///
    /// Ambiguous midnights resolve to the earlier instant. A midnight skipped by a
    /// DST gap resolves to the first wall-clock hour that exists.
    pub fn midnight(&self, date: NaiveDate) -> Option<DateTime<FixedOffset>> {
        let midnight = date.and_hms_opt(0, 0, 0)?;
        match self {
            LocalZone::Fixed(offset) => offset.from_local_datetime(&midnight).single(),
            LocalZone::Named(tz) => {
                let mut local = midnight;
                for _ in 0..=MAX_GAP_HOURS {
                    if let Some(instant) = tz.from_local_datetime(&local).earliest() {
                        return Some(instant.with_timezone(&instant.offset().fix()));
                    }
                    local += Duration::hours(1);
                }
                tracing::warn!(%date, zone = %tz.name(), "No valid local midnight found");
                None
            }
        }
    }
}
