use chrono::{Datelike, NaiveDate};

use crate::dates;
use crate::error::DividendResult;
use crate::models::{
    CalendarCell, DistributionBucket, DividendRecord, EventKind, UpcomingEvent, Urgency,
};

pub const DEFAULT_UPCOMING_LIMIT: usize = 5;

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
const QUARTER_LABELS: [&str; 4] = ["Q1", "Q2", "Q3", "Q4"];

fn to_buckets(labels: &[&'static str], counts: &[usize]) -> Vec<DistributionBucket> {
    let max = counts.iter().copied().max().unwrap_or(0).max(1) as f64;
    labels
        .iter()
        .zip(counts)
        .map(|(label, count)| DistributionBucket {
            label: *label,
            count: *count,
            height_percent: *count as f64 / max * 100.0,
        })
        .collect()
}

fn ex_dates_in_year(
    events: &[DividendRecord],
    year: i32,
) -> impl Iterator<Item = NaiveDate> + '_ {
    events
        .iter()
        .filter_map(|event| event.ex_date)
        .filter(move |date| date.year() == year)
}

/// Ex-date counts per month of `year`.
pub fn distribution_by_month(events: &[DividendRecord], year: i32) -> Vec<DistributionBucket> {
    let mut counts = [0usize; 12];
    for date in ex_dates_in_year(events, year) {
        counts[date.month0() as usize] += 1;
    }
    to_buckets(&MONTH_LABELS, &counts)
}

pub fn distribution_by_quarter(events: &[DividendRecord], year: i32) -> Vec<DistributionBucket> {
    let mut counts = [0usize; 4];
    for date in ex_dates_in_year(events, year) {
        counts[(date.month0() / 3) as usize] += 1;
    }
    to_buckets(&QUARTER_LABELS, &counts)
}

pub fn events_on_day(events: &[DividendRecord], date: NaiveDate) -> Vec<DividendRecord> {
    events
        .iter()
        .filter(|event| event.ex_date == Some(date) || event.payment_date == Some(date))
        .cloned()
        .collect()
}

/// Monday-first month grid; `None` entries are the blanks before day 1.
pub fn build_month_grid(
    events: &[DividendRecord],
    year: i32,
    month0: u32,
) -> DividendResult<Vec<Option<CalendarCell>>> {
    let first = dates::first_of_month(year, month0)?;
    let blanks = dates::monday_offset(dates::first_weekday(year, month0)?);
    let days = dates::days_in_month(year, month0)?;

    let mut grid: Vec<Option<CalendarCell>> = (0..blanks).map(|_| None).collect();
    for date in first.iter_days().take(days as usize) {
        grid.push(Some(CalendarCell {
            day: date.day(),
            events: events_on_day(events, date),
        }));
    }
    Ok(grid)
}

/// The nearest of an event's dates falling on or after `today`.
fn next_occurrence(event: &DividendRecord, today: NaiveDate) -> Option<(EventKind, NaiveDate)> {
    let ex = event
        .ex_date
        .filter(|date| *date >= today)
        .map(|date| (EventKind::ExDate, date));
    let payment = event
        .payment_date
        .filter(|date| *date >= today)
        .map(|date| (EventKind::Payment, date));

    match (ex, payment) {
        (Some(ex), Some(payment)) => Some(if payment.1 < ex.1 { payment } else { ex }),
        (ex, payment) => ex.or(payment),
    }
}

pub fn upcoming_events(
    events: &[DividendRecord],
    today: NaiveDate,
    limit: usize,
) -> Vec<UpcomingEvent> {
    let mut upcoming: Vec<UpcomingEvent> = events
        .iter()
        .filter_map(|event| {
            let (kind, date) = next_occurrence(event, today)?;
            let days_until = (date - today).num_days();
            Some(UpcomingEvent {
                record: event.clone(),
                kind,
                date,
                days_until,
                urgency: Urgency::from_days(days_until),
            })
        })
        .collect();

    upcoming.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.record.ticker.cmp(&b.record.ticker))
    });
    upcoming.truncate(limit);
    upcoming
}

/// Narrows a dataset by sector and/or ticker, case-insensitively.
pub fn filter_records(
    events: &[DividendRecord],
    sector: Option<&str>,
    ticker: Option<&str>,
) -> Vec<DividendRecord> {
    events
        .iter()
        .filter(|event| sector.map_or(true, |sector| event.sector.eq_ignore_ascii_case(sector)))
        .filter(|event| ticker.map_or(true, |ticker| event.ticker.eq_ignore_ascii_case(ticker)))
        .cloned()
        .collect()
}
