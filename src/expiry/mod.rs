// Subscription expiry tracking
//
// Both computations take `now` explicitly and work on UTC calendar fields,
// never on elapsed seconds: one month is "same day next month".
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;
use std::fmt;

/// Inclusive window, in whole UTC days, in which a payment counts as due soon
pub const DUE_SOON_DAYS: i64 = 7;

pub const EXPIRED_LABEL: &str = "Expired";

/// Calendar breakdown of the time left until a subscription ends
///
/// When `expired` is set the unit fields are not meant for display.
/// `days` can stay negative after the borrow when the month preceding the
/// end date is shorter than the day gap (e.g. Jan 31 -> Mar 1); such a
/// breakdown is still live and only its positive units are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RemainingDuration {
    pub years: i32,
    pub months: i32,
    pub days: i32,
    pub expired: bool,
}

impl RemainingDuration {
    /// Human label, e.g. "1 year, 3 days remaining" or "Expired"
    pub fn label(&self) -> String {
        if self.expired {
            return EXPIRED_LABEL.to_string();
        }

        let mut parts = Vec::with_capacity(3);
        if self.years > 0 {
            parts.push(unit(self.years, "year"));
        }
        if self.months > 0 {
            parts.push(unit(self.months, "month"));
        }
        if self.days > 0 || (self.years == 0 && self.months == 0 && self.days == 0) {
            parts.push(unit(self.days, "day"));
        }

        if parts.is_empty() {
            return EXPIRED_LABEL.to_string();
        }

        format!("{} remaining", parts.join(", "))
    }
}

impl fmt::Display for RemainingDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

fn unit(count: i32, name: &str) -> String {
    if count == 1 {
        format!("{} {}", count, name)
    } else {
        format!("{} {}s", count, name)
    }
}

/// Calendar subtraction of `now` from `end`
///
/// Days borrow from the month immediately preceding `end`'s month, then
/// months borrow from years. Expiry is classified after both borrows.
pub fn remaining(end: &DateTime<Utc>, now: &DateTime<Utc>) -> RemainingDuration {
    let mut years = end.year() - now.year();
    let mut months = end.month() as i32 - now.month() as i32;
    let mut days = end.day() as i32 - now.day() as i32;

    if days < 0 {
        months -= 1;
        let (prev_year, prev_month) = previous_month(end.year(), end.month());
        days += days_in_month(prev_year, prev_month) as i32;
    }

    if months < 0 {
        years -= 1;
        months += 12;
    }

    let expired = years < 0 || (years == 0 && months == 0 && days < 0);

    RemainingDuration {
        years,
        months,
        days,
        expired,
    }
}

/// Label for an optional end date; no end date means no indicator at all
pub fn time_remaining(end: Option<&DateTime<Utc>>, now: &DateTime<Utc>) -> Option<String> {
    end.map(|end| remaining(end, now).label())
}

/// Signed difference between the UTC dates of `end` and `now`, in whole days
pub fn days_until(end: &DateTime<Utc>, now: &DateTime<Utc>) -> i64 {
    end.date_naive()
        .signed_duration_since(now.date_naive())
        .num_days()
}

/// True when the end date is today or within the next `DUE_SOON_DAYS` days
pub fn due_soon(end: &DateTime<Utc>, now: &DateTime<Utc>) -> bool {
    (0..=DUE_SOON_DAYS).contains(&days_until(end, now))
}

fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

/// Number of days in the given month (1-based), leap years included
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if NaiveDate::from_ymd_opt(year, 2, 29).is_some() => 29,
        2 => 28,
        _ => 30,
    }
}
