use chrono::{DateTime, Datelike, NaiveDate};

use crate::error::{DividendError, DividendResult};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y"];

/// Number of days in the month. `month0` is 0-based (January = 0).
pub fn days_in_month(year: i32, month0: u32) -> DividendResult<u32> {
    let (next_year, next_month0) = if month0 == 11 {
        (year + 1, 0)
    } else {
        (year, month0 + 1)
    };
    first_of_month(next_year, next_month0)?
        .pred_opt()
        .map(|last| last.day())
        .ok_or(DividendError::InvalidMonth(month0))
}

/// Weekday of the first day of the month, 0 = Sunday.
pub fn first_weekday(year: i32, month0: u32) -> DividendResult<u32> {
    Ok(first_of_month(year, month0)?.weekday().num_days_from_sunday())
}

/// Leading blank cells a Monday-first grid needs for a Sunday-first weekday.
pub fn monday_offset(weekday: u32) -> u32 {
    (weekday % 7 + 6) % 7
}

pub fn first_of_month(year: i32, month0: u32) -> DividendResult<NaiveDate> {
    if month0 > 11 {
        return Err(DividendError::InvalidMonth(month0));
    }
    NaiveDate::from_ymd_opt(year, month0 + 1, 1).ok_or(DividendError::InvalidMonth(month0))
}

pub fn parse_date(text: &str) -> DividendResult<NaiveDate> {
    let trimmed = text.trim();
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Ok(date);
        }
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(datetime.date_naive());
    }

    Err(DividendError::InvalidDate(text.to_string()))
}
