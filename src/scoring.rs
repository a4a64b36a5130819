//! Dividend scores: C-DRS reliability, PRT payback and NDF forecast.
//!
//! Every function here is pure. Inputs are validated when the
//! [`DividendSeries`] is built, so scoring a series never fails.

use std::collections::BTreeSet;

use crate::error::{DividendError, DividendResult};
use crate::models::{
    is_increase, CompanyProfile, DividendRecord, DividendSeries, Forecast, PaybackScore,
    ReliabilityScore, ScoreLabel, Scorecard,
};

const REGULARITY_WEIGHTS: [f64; 5] = [1.0, 2.0, 3.0, 4.0, 5.0];
const REGULARITY_MAX: f64 = 25.0;
const GROWTH_WEIGHTS: [f64; 4] = [2.0, 3.0, 4.0, 5.0];
const GROWTH_YEARS_MAX: f64 = 20.0;
const DECLINE_MULTIPLIERS: [f64; 4] = [1.0, 1.2, 1.5, 2.0];
const PENALTY_FLOOR: f64 = -5.0;
const STABILITY_MAX: f64 = 25.0;
const MAGNITUDE_MAX: f64 = 15.0;
const MAGNITUDE_FALLBACK: f64 = 7.0;

const DEFAULT_VOLATILITY: f64 = 0.06;
const MAX_VOLATILITY: f64 = 0.15;

/// Placeholder window; not derived from historical ex-dates.
// TODO: estimate the window from each company's past ex-date seasonality.
pub const EX_DATE_WINDOW: &str = "mid-June to mid-July";

/// `Math.round` semantics: ties go toward positive infinity.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

fn round_cents(value: f64) -> f64 {
    round_half_up(value * 100.0) / 100.0
}

/// Population mean and standard deviation.
fn mean_and_std(values: &[f64]) -> Option<(f64, f64)> {
    if values.is_empty() {
        return None;
    }
    let count = values.len() as f64;
    let mean = values.iter().sum::<f64>() / count;
    let variance = values
        .iter()
        .map(|value| {
            let diff = value - mean;
            diff * diff
        })
        .sum::<f64>()
        / count;
    Some((mean, variance.sqrt()))
}

pub fn regularity(series: &DividendSeries) -> f64 {
    let paid: f64 = series
        .values()
        .iter()
        .zip(REGULARITY_WEIGHTS)
        .filter(|(value, _)| **value > 0.0)
        .map(|(_, weight)| weight)
        .sum();
    let total: f64 = REGULARITY_WEIGHTS.iter().sum();
    paid / total * REGULARITY_MAX
}

pub fn growth_years(series: &DividendSeries) -> f64 {
    let earned: f64 = series
        .transitions()
        .filter(|(_, prev, cur)| is_increase(*prev, *cur))
        .map(|(position, _, _)| GROWTH_WEIGHTS[position - 1])
        .sum();
    let total: f64 = GROWTH_WEIGHTS.iter().sum();
    earned / total * GROWTH_YEARS_MAX
}

/// Bonus for consecutive increases; runs reaching the latest year pay more.
pub fn bonus_growth(series: &DividendSeries) -> f64 {
    let mut current = 0usize;
    let mut longest = 0usize;
    for (_, prev, cur) in series.transitions() {
        if is_increase(prev, cur) {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }

    match (current, longest) {
        (4.., _) => 10.0,
        (3, _) => 8.0,
        (2, _) => 5.0,
        (_, 3..) => 5.0,
        (_, 2) => 3.0,
        _ => 0.0,
    }
}

pub fn penalty_decline(series: &DividendSeries) -> f64 {
    let sum: f64 = series
        .transitions()
        .filter(|(_, prev, cur)| *prev > 0.0 && cur < prev)
        .map(|(position, prev, cur)| {
            let decline = (prev - cur) / prev;
            let base = if decline > 0.30 {
                -3.0
            } else if decline > 0.20 {
                -2.0
            } else if decline > 0.10 {
                -1.0
            } else {
                0.0
            };
            base * DECLINE_MULTIPLIERS[position - 1]
        })
        .sum();
    sum.max(PENALTY_FLOOR)
}

pub fn stability(series: &DividendSeries) -> f64 {
    let positives = series.positive_values();
    if positives.len() < 2 {
        return 0.0;
    }
    match mean_and_std(&positives) {
        Some((mean, std)) => {
            let cv = std / mean * 100.0;
            (STABILITY_MAX - cv / 2.0).max(0.0)
        }
        None => 0.0,
    }
}

pub fn magnitude(series: &DividendSeries) -> f64 {
    let (first, last) = (series.earliest(), series.latest());
    if first > 0.0 && last > 0.0 {
        let steps = (series.values().len() - 1) as f64;
        let tcam = (last / first).powf(1.0 / steps) - 1.0;
        ((tcam * 100.0 / 10.0) * MAGNITUDE_MAX).clamp(0.0, MAGNITUDE_MAX)
    } else if last > 0.0 {
        MAGNITUDE_FALLBACK
    } else {
        0.0
    }
}

/// C-DRS. The growth component is summed as is, even when negative.
pub fn reliability_score(series: &DividendSeries) -> ReliabilityScore {
    let regularity = regularity(series);
    let growth_years = growth_years(series);
    let bonus_growth = bonus_growth(series);
    let penalty_decline = penalty_decline(series);
    let growth = growth_years + bonus_growth + penalty_decline;
    let stability = stability(series);
    let magnitude = magnitude(series);

    ReliabilityScore {
        total: round_half_up(regularity + growth + stability + magnitude) as i64,
        regularity: round_half_up(regularity) as i64,
        growth: round_half_up(growth) as i64,
        stability: round_half_up(stability) as i64,
        magnitude: round_half_up(magnitude) as i64,
        growth_years,
        bonus_growth,
        penalty_decline,
    }
}

pub fn reliability_label(total: i64) -> ScoreLabel {
    let (label, interpretation) = match total {
        90.. => (
            "Exceptional",
            "Uninterrupted and growing distributions with very low volatility.",
        ),
        80..=89 => (
            "Highly Reliable",
            "Consistent payer with a solid growth track record.",
        ),
        70..=79 => (
            "Reliable",
            "Regular distributions with minor irregularities.",
        ),
        60..=69 => (
            "Moderately Reliable",
            "Mostly regular, but growth or stability is uneven.",
        ),
        50..=59 => (
            "Fair",
            "Distributions are irregular; treat the yield with caution.",
        ),
        _ => (
            "Unreliable",
            "Sporadic or shrinking distributions; not suited to income investing.",
        ),
    };
    ScoreLabel {
        label,
        interpretation,
    }
}

pub fn payback_score(prt_days: u32) -> PaybackScore {
    let score = round_half_up(100.0 - f64::from(prt_days) * 1.5).max(0.0);
    PaybackScore {
        prt_days,
        score: score as i64,
    }
}

pub fn payback_label(prt_days: u32) -> ScoreLabel {
    let (label, interpretation) = match prt_days {
        0..=15 => (
            "Excellent",
            "The price recovers the dividend almost immediately.",
        ),
        16..=30 => ("Good", "The price gap closes within a month."),
        31..=45 => ("Average", "Recovery takes about a month and a half."),
        46..=60 => ("Fair", "Capital stays below its pre-dividend level for up to two months."),
        _ => (
            "Poor",
            "The drop after the ex-date takes more than two months to recover.",
        ),
    };
    ScoreLabel {
        label,
        interpretation,
    }
}

pub fn payback_days_label(prt_days: u32) -> &'static str {
    match prt_days {
        0..=15 => "0-15 days",
        16..=30 => "16-30 days",
        31..=45 => "31-45 days",
        46..=60 => "46-60 days",
        _ => "60+ days",
    }
}

/// Growth of each pair of paying years, weighted by the position of the
/// later year.
pub fn weighted_trend(series: &DividendSeries) -> f64 {
    let (weighted_sum, weight_sum) = series
        .transitions()
        .filter(|(_, prev, cur)| *prev > 0.0 && *cur > 0.0)
        .fold((0.0, 0.0), |(sum, weights), (position, prev, cur)| {
            let weight = REGULARITY_WEIGHTS[position];
            (sum + (cur - prev) / prev * weight, weights + weight)
        });

    if weight_sum > 0.0 {
        weighted_sum / weight_sum
    } else {
        0.0
    }
}

pub fn forecast_volatility(series: &DividendSeries) -> f64 {
    let positives = series.positive_values();
    if positives.len() < 3 {
        return DEFAULT_VOLATILITY;
    }
    match mean_and_std(&positives) {
        Some((mean, std)) => (std / mean).min(MAX_VOLATILITY),
        None => DEFAULT_VOLATILITY,
    }
}

/// NDF for the year following the series.
pub fn forecast(series: &DividendSeries) -> Forecast {
    let trend_rate = weighted_trend(series);
    let trend = series.latest() * (1.0 + trend_rate);
    let volatility = forecast_volatility(series);

    let paying_years = series.positive_values().len() as f64;
    let regularity_part = paying_years / series.values().len() as f64 * 40.0;
    let stability_part = (30.0 - volatility * 100.0).max(0.0);
    let growth_part = series.increase_count() as f64 / 4.0 * 30.0;
    let confidence = round_half_up(regularity_part + stability_part + growth_part).clamp(0.0, 100.0);

    Forecast {
        year: series.last_year() + 1,
        div_min: round_cents(trend * (1.0 - volatility)),
        div_max: round_cents(trend * (1.0 + volatility)),
        div_probable: round_cents(trend),
        confidence: confidence as i64,
        tcam: round_half_up(trend_rate * 1000.0) / 10.0,
        volatility,
        ex_date_window: EX_DATE_WINDOW,
    }
}

/// Confidence label with its star rating.
pub fn forecast_label(confidence: i64) -> (ScoreLabel, u8) {
    let (label, interpretation, stars) = match confidence {
        85.. => (
            "Very High",
            "Long, steady history; the range is a dependable guide.",
            5,
        ),
        70..=84 => ("High", "Regular history with limited surprises.", 4),
        55..=69 => (
            "Medium",
            "Some gaps or swings; expect the amount near the range bounds.",
            3,
        ),
        40..=54 => ("Low", "Irregular history; the forecast is indicative only.", 2),
        _ => (
            "Very Low",
            "Too few or too erratic distributions to forecast reliably.",
            1,
        ),
    };
    (
        ScoreLabel {
            label,
            interpretation,
        },
        stars,
    )
}

/// Runs every score for one company.
pub fn scorecard(
    series: DividendSeries,
    template: &DividendRecord,
    profile: Option<&CompanyProfile>,
) -> Scorecard {
    let reliability = reliability_score(&series);
    let reliability_label = reliability_label(reliability.total);
    let payback = profile.map(|profile| payback_score(profile.prt));
    let payback_label = profile.map(|profile| payback_label(profile.prt));
    let forecast = forecast(&series);
    let (forecast_label, forecast_stars) = forecast_label(forecast.confidence);

    Scorecard {
        ticker: template.ticker.clone(),
        company: template.company.clone(),
        sector: template.sector.clone(),
        series,
        reliability,
        reliability_label,
        payback,
        payback_label,
        beta: profile.map(|profile| profile.beta),
        forecast,
        forecast_label,
        forecast_stars,
    }
}

/// Scores one ticker from a multi-year dataset; the newest record supplies
/// the company name and sector.
pub fn company_scorecard(
    ticker: &str,
    records: &[DividendRecord],
    profiles: &[CompanyProfile],
    first_year: i32,
) -> DividendResult<Scorecard> {
    let template = records
        .iter()
        .filter(|record| record.ticker.eq_ignore_ascii_case(ticker))
        .max_by_key(|record| (record.year, record.ex_date))
        .ok_or_else(|| DividendError::UnknownTicker(ticker.to_string()))?;
    let series = DividendSeries::from_records(&template.ticker, records, first_year)?;
    let profile = profiles
        .iter()
        .find(|profile| profile.ticker.eq_ignore_ascii_case(&template.ticker));
    Ok(scorecard(series, template, profile))
}

/// Every ticker in the dataset, best C-DRS first.
pub fn rank_companies(
    records: &[DividendRecord],
    profiles: &[CompanyProfile],
    first_year: i32,
) -> DividendResult<Vec<Scorecard>> {
    let tickers: BTreeSet<&str> = records.iter().map(|record| record.ticker.as_str()).collect();
    let mut cards = tickers
        .into_iter()
        .map(|ticker| company_scorecard(ticker, records, profiles, first_year))
        .collect::<DividendResult<Vec<_>>>()?;

    cards.sort_by(|a, b| {
        b.reliability
            .total
            .cmp(&a.reliability.total)
            .then_with(|| b.forecast.confidence.cmp(&a.forecast.confidence))
            .then_with(|| a.ticker.cmp(&b.ticker))
    });
    Ok(cards)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: [f64; 5]) -> DividendSeries {
        DividendSeries::new(2020, &values).unwrap()
    }

    #[test]
    fn rounding_matches_half_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(-0.5), 0.0);
        assert_eq!(round_cents(1.005 + 1e-9), 1.01);
    }

    #[test]
    fn flat_series_is_perfectly_stable() {
        let score = reliability_score(&series([7.0, 7.0, 7.0, 7.0, 7.0]));
        assert_eq!(score.stability, 25);
        assert_eq!(score.regularity, 25);
        assert_eq!(score.magnitude, 0);
        assert_eq!(score.growth, 0);
    }

    #[test]
    fn missing_year_lowers_regularity() {
        let cases = [
            [0.0, 1.0, 1.0, 1.0, 1.0],
            [1.0, 1.0, 0.0, 1.0, 1.0],
            [1.0, 1.0, 1.0, 1.0, 0.0],
        ];
        for values in cases {
            assert!(regularity(&series(values)) < 25.0);
        }
        // Recent gaps cost more than old ones.
        assert!(regularity(&series(cases[0])) > regularity(&series(cases[2])));
    }

    #[test]
    fn strictly_increasing_series_earns_full_bonus() {
        let s = series([1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(bonus_growth(&s), 10.0);
        assert_eq!(growth_years(&s), 20.0);
        assert_eq!(penalty_decline(&s), 0.0);
    }

    #[test]
    fn bonus_tiers_prefer_recent_runs() {
        assert_eq!(bonus_growth(&series([5.0, 1.0, 2.0, 3.0, 4.0])), 8.0);
        assert_eq!(bonus_growth(&series([5.0, 5.0, 1.0, 2.0, 3.0])), 5.0);
        assert_eq!(bonus_growth(&series([1.0, 2.0, 3.0, 4.0, 1.0])), 5.0);
        assert_eq!(bonus_growth(&series([1.0, 2.0, 3.0, 1.0, 1.0])), 3.0);
        assert_eq!(bonus_growth(&series([3.0, 2.0, 1.0, 2.0, 1.0])), 0.0);
    }

    #[test]
    fn strictly_decreasing_series_hits_penalty_floor() {
        let s = series([10.0, 8.0, 6.0, 4.0, 2.0]);
        assert_eq!(penalty_decline(&s), -5.0);
        assert_eq!(bonus_growth(&s), 0.0);
        assert_eq!(magnitude(&s), 0.0);
    }

    #[test]
    fn small_declines_are_weighted_by_recency() {
        // 15% drop on the oldest transition, 25% drop on the newest.
        let s = series([10.0, 8.5, 8.5, 8.5, 6.375]);
        assert!((penalty_decline(&s) - (-1.0 - 4.0)).abs() < 1e-9);

        let s = series([10.0, 10.0, 10.0, 10.0, 8.5]);
        assert!((penalty_decline(&s) + 2.0).abs() < 1e-9);
    }

    #[test]
    fn magnitude_fallback_when_history_starts_late() {
        assert_eq!(magnitude(&series([0.0, 0.0, 3.0, 4.0, 5.0])), 7.0);
        assert_eq!(magnitude(&series([3.0, 4.0, 5.0, 6.0, 0.0])), 0.0);
        // Doubling over four steps is well above the 10% cap.
        assert_eq!(magnitude(&series([1.0, 1.2, 1.5, 1.8, 2.0])), 15.0);
    }

    #[test]
    fn growing_series_is_highly_reliable() {
        let score = reliability_score(&series([10.0, 11.0, 12.0, 13.5, 15.0]));
        assert_eq!(score.regularity, 25);
        assert_eq!(score.bonus_growth, 10.0);
        assert_eq!(score.growth, 30);
        assert_eq!(score.stability, 18);
        assert_eq!(score.magnitude, 15);
        assert_eq!(score.total, 88);
        assert_eq!(reliability_label(score.total).label, "Highly Reliable");
    }

    #[test]
    fn sporadic_series_is_unreliable() {
        let score = reliability_score(&series([0.0, 0.0, 5.0, 0.0, 8.0]));
        assert_eq!(score.regularity, 13);
        assert_eq!(score.bonus_growth, 0.0);
        assert_eq!(score.penalty_decline, -4.5);
        assert_eq!(score.magnitude, 7);
        assert_eq!(score.total, 29);
        assert_eq!(reliability_label(score.total).label, "Unreliable");
    }

    #[test]
    fn negative_growth_is_summed_without_flooring() {
        let score = reliability_score(&series([10.0, 8.0, 6.0, 4.0, 2.0]));
        assert_eq!(score.growth, -5);
        let clamped_parts =
            score.regularity + score.growth.max(0) + score.stability + score.magnitude;
        assert!(score.total < clamped_parts);
    }

    #[test]
    fn reliability_labels_by_tier() {
        assert_eq!(reliability_label(95).label, "Exceptional");
        assert_eq!(reliability_label(90).label, "Exceptional");
        assert_eq!(reliability_label(80).label, "Highly Reliable");
        assert_eq!(reliability_label(75).label, "Reliable");
        assert_eq!(reliability_label(60).label, "Moderately Reliable");
        assert_eq!(reliability_label(50).label, "Fair");
        assert_eq!(reliability_label(-3).label, "Unreliable");
    }

    #[test]
    fn payback_score_bounds() {
        assert_eq!(payback_score(0).score, 100);
        assert_eq!(payback_score(10).score, 85);
        assert_eq!(payback_score(67).score, 0);
        assert_eq!(payback_score(400).score, 0);
    }

    #[test]
    fn payback_score_never_increases_with_days() {
        let scores: Vec<i64> = (0..120).map(|days| payback_score(days).score).collect();
        assert!(scores.windows(2).all(|pair| pair[0] >= pair[1]));
    }

    #[test]
    fn payback_labels_by_tier() {
        assert_eq!(payback_label(15).label, "Excellent");
        assert_eq!(payback_label(16).label, "Good");
        assert_eq!(payback_label(45).label, "Average");
        assert_eq!(payback_label(60).label, "Fair");
        assert_eq!(payback_label(61).label, "Poor");
        assert_eq!(payback_days_label(61), "60+ days");
    }

    #[test]
    fn forecast_projects_weighted_trend() {
        let s = series([10.0, 10.0, 10.0, 10.0, 10.0]);
        let f = forecast(&s);
        assert_eq!(f.year, 2025);
        assert_eq!(f.div_probable, 10.0);
        assert_eq!(f.volatility, 0.0);
        assert_eq!(f.div_min, 10.0);
        assert_eq!(f.div_max, 10.0);
        // 40 regularity + 30 stability + 0 growth.
        assert_eq!(f.confidence, 70);
        assert_eq!(f.tcam, 0.0);
    }

    #[test]
    fn forecast_trend_weights_recent_growth() {
        // Only the last pair is a valid growth pair: +50% weighted 5.
        let s = series([0.0, 0.0, 0.0, 2.0, 3.0]);
        assert!((weighted_trend(&s) - 0.5).abs() < 1e-12);
        let f = forecast(&s);
        assert_eq!(f.div_probable, 4.5);
        assert_eq!(f.tcam, 50.0);
        // Two paying years keep the default volatility.
        assert_eq!(f.volatility, DEFAULT_VOLATILITY);
        assert_eq!(f.div_min, 4.23);
        assert_eq!(f.div_max, 4.77);
    }

    #[test]
    fn forecast_trend_weights_every_growth_pair_by_position() {
        // Rates 10%, 9.09%, 12.5%, 11.11% weighted 2, 3, 4, 5.
        let s = series([10.0, 11.0, 12.0, 13.5, 15.0]);
        assert!((weighted_trend(&s) - 0.10916305916305916).abs() < 1e-9);

        let f = forecast(&s);
        assert_eq!(f.tcam, 10.9);
        assert_eq!(f.confidence, 86);
        assert_eq!(f.div_probable, 16.64);
        assert_eq!(f.div_min, 14.23);
        assert_eq!(f.div_max, 19.04);
    }

    #[test]
    fn growth_years_weights_each_increase_by_position() {
        // Increases at transitions 1 and 3 earn weights 2 and 4 of 14.
        let s = series([1.0, 2.0, 2.0, 3.0, 1.0]);
        assert!((growth_years(&s) - 8.571428571428571).abs() < 1e-9);
    }

    #[test]
    fn magnitude_scales_compound_growth_below_the_cap() {
        // About 4% a year over four steps.
        let s = series([10.0, 10.4, 10.8, 11.2, 11.7]);
        assert!((magnitude(&s) - 6.004715022918239).abs() < 1e-9);
    }

    #[test]
    fn forecast_volatility_is_capped() {
        let s = series([1.0, 10.0, 1.0, 10.0, 1.0]);
        assert_eq!(forecast_volatility(&s), MAX_VOLATILITY);
    }

    #[test]
    fn forecast_range_is_ordered() {
        let cases = [
            [10.0, 11.0, 12.0, 13.5, 15.0],
            [0.0, 0.0, 5.0, 0.0, 8.0],
            [10.0, 8.0, 6.0, 4.0, 2.0],
            [0.0, 0.0, 0.0, 0.0, 0.0],
            [3.0, 9.0, 1.0, 7.0, 2.0],
        ];
        for values in cases {
            let f = forecast(&series(values));
            assert!(f.div_min <= f.div_probable, "{values:?}");
            assert!(f.div_probable <= f.div_max, "{values:?}");
            assert!((0..=100).contains(&f.confidence));
        }
    }

    #[test]
    fn growing_series_forecast_confidence() {
        let f = forecast(&series([10.0, 11.0, 12.0, 13.5, 15.0]));
        let (label, stars) = forecast_label(f.confidence);
        assert!(f.div_probable > 15.0);
        assert!(f.tcam > 0.0);
        assert!(f.confidence >= 85);
        assert_eq!(label.label, "Very High");
        assert_eq!(stars, 5);
        assert_eq!(f.ex_date_window, EX_DATE_WINDOW);
    }

    #[test]
    fn forecast_labels_by_tier() {
        assert_eq!(forecast_label(85).1, 5);
        assert_eq!(forecast_label(70).0.label, "High");
        assert_eq!(forecast_label(55).0.label, "Medium");
        assert_eq!(forecast_label(40).0.label, "Low");
        assert_eq!(forecast_label(39), (forecast_label(0).0, 1));
    }

    #[test]
    fn scorecard_without_profile_skips_payback() {
        let template = DividendRecord {
            ticker: "CSR".to_string(),
            company: "Cosumar".to_string(),
            sector: "Agri-food".to_string(),
            year: 2024,
            ex_date: None,
            payment_date: None,
            amount: 5.0,
        };
        let card = scorecard(series([4.0, 4.5, 5.0, 5.0, 5.0]), &template, None);
        assert!(card.payback.is_none());
        assert!(card.beta.is_none());

        let profile = CompanyProfile {
            ticker: "CSR".to_string(),
            prt: 20,
            beta: 0.7,
        };
        let card = scorecard(series([4.0, 4.5, 5.0, 5.0, 5.0]), &template, Some(&profile));
        assert_eq!(card.payback.map(|p| p.score), Some(70));
        assert_eq!(card.payback_label.map(|l| l.label), Some("Good"));
    }

    fn yearly(ticker: &str, amounts: [f64; 5]) -> Vec<DividendRecord> {
        amounts
            .iter()
            .enumerate()
            .filter(|(_, amount)| **amount > 0.0)
            .map(|(offset, amount)| DividendRecord {
                ticker: ticker.to_string(),
                company: format!("{ticker} SA"),
                sector: "Banks".to_string(),
                year: 2020 + offset as i32,
                ex_date: None,
                payment_date: None,
                amount: *amount,
            })
            .collect()
    }

    #[test]
    fn ranking_puts_reliable_payers_first() {
        let mut records = yearly("MNG", [0.0, 0.0, 30.0, 0.0, 40.0]);
        records.extend(yearly("ATW", [10.0, 11.0, 12.0, 13.5, 15.0]));
        records.extend(yearly("IAM", [7.0, 7.0, 7.0, 7.0, 7.0]));

        let cards = rank_companies(&records, &[], 2020).unwrap();
        let order: Vec<&str> = cards.iter().map(|card| card.ticker.as_str()).collect();
        assert_eq!(order, vec!["ATW", "IAM", "MNG"]);
        assert_eq!(cards[0].reliability.total, 88);
    }

    #[test]
    fn company_scorecard_matches_ticker_case_insensitively() {
        let records = yearly("CSR", [4.0, 4.5, 5.0, 5.0, 5.0]);
        let profiles = vec![CompanyProfile {
            ticker: "CSR".to_string(),
            prt: 12,
            beta: 0.58,
        }];
        let card = company_scorecard("csr", &records, &profiles, 2020).unwrap();
        assert_eq!(card.ticker, "CSR");
        assert_eq!(card.payback.map(|p| p.score), Some(82));
        assert_eq!(card.beta, Some(0.58));

        assert!(matches!(
            company_scorecard("XYZ", &records, &profiles, 2020),
            Err(DividendError::UnknownTicker(_))
        ));
    }
}
