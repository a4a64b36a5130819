use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{DividendError, DividendResult};

pub const SERIES_YEARS: usize = 5;

/// One distribution event as published by the exchange.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DividendRecord {
    pub ticker: String,
    pub company: String,
    pub sector: String,
    pub year: i32,
    pub ex_date: Option<NaiveDate>,
    pub payment_date: Option<NaiveDate>,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub ticker: String,
    /// Days for the price to recover its pre-ex-dividend level.
    pub prt: u32,
    pub beta: f64,
}

/// Five consecutive yearly dividend amounts, oldest first. Zero means no
/// distribution that year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DividendSeries {
    first_year: i32,
    values: [f64; SERIES_YEARS],
}

impl DividendSeries {
    pub fn new(first_year: i32, values: &[f64]) -> DividendResult<Self> {
        if values.len() != SERIES_YEARS {
            return Err(DividendError::InvalidSeries(format!(
                "expected {SERIES_YEARS} yearly values, got {}",
                values.len()
            )));
        }

        let mut checked = [0.0; SERIES_YEARS];
        for (slot, value) in checked.iter_mut().zip(values) {
            if !value.is_finite() || *value < 0.0 {
                return Err(DividendError::InvalidSeries(format!(
                    "amount {value} is not a non-negative number"
                )));
            }
            *slot = *value;
        }

        Ok(Self {
            first_year,
            values: checked,
        })
    }

    /// Sums every record of `ticker` into its distribution year.
    pub fn from_records(
        ticker: &str,
        records: &[DividendRecord],
        first_year: i32,
    ) -> DividendResult<Self> {
        let mut values = [0.0; SERIES_YEARS];
        let mut seen = false;

        for record in records.iter().filter(|record| record.ticker == ticker) {
            seen = true;
            let offset = record.year - first_year;
            if (0..SERIES_YEARS as i32).contains(&offset) {
                values[offset as usize] += record.amount;
            }
        }

        if !seen {
            return Err(DividendError::UnknownTicker(ticker.to_string()));
        }

        Self::new(first_year, &values)
    }

    pub fn values(&self) -> &[f64; SERIES_YEARS] {
        &self.values
    }

    pub fn first_year(&self) -> i32 {
        self.first_year
    }

    pub fn last_year(&self) -> i32 {
        self.first_year + SERIES_YEARS as i32 - 1
    }

    pub fn earliest(&self) -> f64 {
        self.values[0]
    }

    pub fn latest(&self) -> f64 {
        self.values[SERIES_YEARS - 1]
    }

    pub fn positive_values(&self) -> Vec<f64> {
        self.values.iter().copied().filter(|v| *v > 0.0).collect()
    }

    /// Year-over-year transitions as `(position, previous, current)`, where
    /// position 1 is the oldest transition.
    pub fn transitions(&self) -> impl Iterator<Item = (usize, f64, f64)> + '_ {
        self.values
            .windows(2)
            .enumerate()
            .map(|(index, pair)| (index + 1, pair[0], pair[1]))
    }

    pub fn increase_count(&self) -> usize {
        self.transitions()
            .filter(|(_, prev, cur)| is_increase(*prev, *cur))
            .count()
    }
}

/// A year-over-year increase only counts between two paying years.
pub fn is_increase(prev: f64, cur: f64) -> bool {
    prev > 0.0 && cur > 0.0 && cur > prev
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReliabilityScore {
    pub total: i64,
    pub regularity: i64,
    pub growth: i64,
    pub stability: i64,
    pub magnitude: i64,
    pub growth_years: f64,
    pub bonus_growth: f64,
    pub penalty_decline: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaybackScore {
    pub prt_days: u32,
    pub score: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    pub year: i32,
    pub div_min: f64,
    pub div_max: f64,
    pub div_probable: f64,
    pub confidence: i64,
    pub tcam: f64,
    pub volatility: f64,
    pub ex_date_window: &'static str,
}

/// Qualitative reading of a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreLabel {
    pub label: &'static str,
    pub interpretation: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scorecard {
    pub ticker: String,
    pub company: String,
    pub sector: String,
    pub series: DividendSeries,
    pub reliability: ReliabilityScore,
    pub reliability_label: ScoreLabel,
    pub payback: Option<PaybackScore>,
    pub payback_label: Option<ScoreLabel>,
    pub beta: Option<f64>,
    pub forecast: Forecast,
    pub forecast_label: ScoreLabel,
    pub forecast_stars: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarCell {
    pub day: u32,
    pub events: Vec<DividendRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionBucket {
    pub label: &'static str,
    pub count: usize,
    pub height_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    ExDate,
    Payment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Imminent,
    Soon,
    Upcoming,
    Future,
}

impl Urgency {
    pub fn from_days(days_until: i64) -> Self {
        match days_until {
            i64::MIN..=3 => Urgency::Imminent,
            4..=7 => Urgency::Soon,
            8..=30 => Urgency::Upcoming,
            _ => Urgency::Future,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Imminent => "imminent",
            Urgency::Soon => "soon",
            Urgency::Upcoming => "upcoming",
            Urgency::Future => "future",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpcomingEvent {
    pub record: DividendRecord,
    pub kind: EventKind,
    pub date: NaiveDate,
    pub days_until: i64,
    pub urgency: Urgency,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectorSummary {
    pub sector: String,
    pub count: usize,
    /// Sum of the distributed amounts, in MAD.
    pub total_amount: f64,
    pub avg_amount: f64,
}

impl SectorSummary {
    pub fn new(sector: String) -> Self {
        Self {
            sector,
            count: 0,
            total_amount: 0.0,
            avg_amount: 0.0,
        }
    }

    pub fn add(&mut self, amount: f64) {
        self.count += 1;
        self.total_amount += amount;
        self.avg_amount = self.total_amount / self.count as f64;
    }
}
