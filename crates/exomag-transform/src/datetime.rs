//! Calendar date helpers for the age and date-formatting steps.

use chrono::{Datelike, NaiveDate};

use crate::error::TransformError;

/// Calendar difference between a birthdate and a reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarAge {
    /// Completed years.
    pub years: i64,
    /// Completed months, i.e. `years * 12` plus the remainder months.
    pub months: i64,
}

/// Parse a strict `YYYY-MM-DD` calendar date.
pub fn parse_iso_date(value: &str) -> Result<NaiveDate, TransformError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| TransformError::Date {
        value: value.to_string(),
    })
}

/// Completed calendar years/months between `birth` and `reference`.
///
/// Reference-date-relative, never wall-clock-relative: one day before the
/// birthday still counts the previous year.
pub fn calendar_age(birth: NaiveDate, reference: NaiveDate) -> CalendarAge {
    let mut years = i64::from(reference.year() - birth.year());
    let mut months = i64::from(reference.month() as i32 - birth.month() as i32);
    if reference.day() < birth.day() {
        months -= 1;
    }
    if months < 0 {
        years -= 1;
        months += 12;
    }
    CalendarAge {
        years,
        months: years * 12 + months,
    }
}

/// Format a date as `DD.MM.YYYY`, the registry's expected form.
pub fn format_german_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}
