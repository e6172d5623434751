//! Date-window evaluation for reminders.
//!
//! Every reminder in the shop (birthday badges, the dashboard alert panel, the
//! inspection reminder mail) asks the same question: how far is a date from today,
//! and is that close enough to mention? This module answers it once.
//!
//! Two flavours exist:
//! - [`evaluate`] treats the date as an *anniversary* (birthdays): only month and
//!   day matter and a date already passed this year wraps to next year.
//! - [`evaluate_due`] treats the date as an absolute *due date* (next inspection):
//!   past dates are simply not upcoming.
//!
//! A Feb-29 anniversary falls on Feb-28 in non-leap years. The same clamp is used
//! by the sale linker when it adds a year to a sale date.

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Largest distance (in days) that still counts as "within a week".
pub const WEEK_DAYS: i64 = 7;

/// Largest distance (in days) that still counts as "within a month".
pub const MONTH_DAYS: i64 = 30;

/// Coarse reminder category for a date's distance from today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    /// The date is today
    Today,
    /// 1 to 7 days away
    WithinWeek,
    /// 8 to 30 days away
    WithinMonth,
    /// Further away, or unknown
    None,
}

impl Bucket {
    /// Buckets a non-negative day distance.
    #[must_use]
    pub const fn for_days(days: i64) -> Self {
        match days {
            0 => Self::Today,
            1..=WEEK_DAYS => Self::WithinWeek,
            8..=MONTH_DAYS => Self::WithinMonth,
            _ => Self::None,
        }
    }
}

/// Result of evaluating one date against a reference day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Window {
    /// Whether the date falls on the reference day
    pub is_today: bool,
    /// Whole days until the next occurrence; `None` when the date was unusable
    pub days_until: Option<i64>,
    /// Reminder category
    pub bucket: Bucket,
}

impl Window {
    /// The window reported for missing or unparseable dates.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            is_today: false,
            days_until: None,
            bucket: Bucket::None,
        }
    }

    const fn from_days(days: i64) -> Self {
        Self {
            is_today: days == 0,
            days_until: Some(days),
            bucket: Bucket::for_days(days),
        }
    }

    /// Whether the date is at most `horizon_days` away (inclusive).
    #[must_use]
    pub fn is_within(&self, horizon_days: i64) -> bool {
        self.days_until.is_some_and(|days| days <= horizon_days)
    }

    /// Human-facing label: "today", "in 1 day", "in 12 days".
    ///
    /// Returns `None` for the [`Bucket::None`] bucket, which is never displayed.
    #[must_use]
    pub fn label(&self) -> Option<String> {
        match (self.bucket, self.days_until) {
            (Bucket::None, _) | (_, None) => None,
            (Bucket::Today, _) => Some("today".to_string()),
            (_, Some(1)) => Some("in 1 day".to_string()),
            (_, Some(days)) => Some(format!("in {days} days")),
        }
    }
}

/// The reference day used by the console: today's local calendar date.
#[must_use]
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Projects an anniversary's month and day onto `year`.
///
/// Feb-29 resolves to Feb-28 when `year` is not a leap year. Returns `None` only
/// when `year` is outside chrono's supported range.
#[must_use]
pub fn anniversary_in_year(anniversary: NaiveDate, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, anniversary.month(), anniversary.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, anniversary.month(), 28))
}

/// Evaluates a recurring anniversary (e.g. a birthday) against `today`.
///
/// The candidate is this year's occurrence; when its month/day matches today's the
/// window is "today", when it has already passed the next year's occurrence is
/// used instead, so `days_until` is never negative.
#[must_use]
pub fn evaluate(anniversary: NaiveDate, today: NaiveDate) -> Window {
    let Some(candidate) = anniversary_in_year(anniversary, today.year()) else {
        return Window::none();
    };

    if candidate.month() == today.month() && candidate.day() == today.day() {
        return Window::from_days(0);
    }

    let next = if candidate < today {
        match anniversary_in_year(anniversary, today.year() + 1) {
            Some(date) => date,
            None => return Window::none(),
        }
    } else {
        candidate
    };

    Window::from_days((next - today).num_days())
}

/// Evaluates an anniversary given as text, as read back from storage or typed in.
///
/// Unparseable input yields [`Window::none`] instead of an error so display code
/// can never fail on a bad date.
#[must_use]
pub fn evaluate_str(raw: &str, today: NaiveDate) -> Window {
    parse_date(raw).map_or_else(Window::none, |date| evaluate(date, today))
}

/// Evaluates an absolute due date against `today`, without any year wrap.
///
/// Returns `None` when the date is already in the past.
#[must_use]
pub fn evaluate_due(due: NaiveDate, today: NaiveDate) -> Option<Window> {
    let days = (due - today).num_days();
    (days >= 0).then(|| Window::from_days(days))
}

/// Parses a calendar date from `YYYY-MM-DD`, an RFC 3339 timestamp or a
/// `YYYY-MM-DDTHH:MM:SS` local timestamp. Time-of-day parts are dropped.
#[must_use]
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}
