use std::collections::BTreeMap;
use std::fmt::Write;

use chrono::NaiveDate;

use crate::calendar;
use crate::error::DividendResult;
use crate::models::{CompanyProfile, DividendRecord, EventKind, SectorSummary, SERIES_YEARS};
use crate::scoring;

/// Distribution count and MAD totals per sector, busiest sector first.
pub fn summarize_by_sector(records: &[DividendRecord]) -> Vec<SectorSummary> {
    let mut sectors: BTreeMap<&str, SectorSummary> = BTreeMap::new();
    for record in records {
        sectors
            .entry(record.sector.as_str())
            .or_insert_with(|| SectorSummary::new(record.sector.clone()))
            .add(record.amount);
    }

    let mut summaries: Vec<SectorSummary> = sectors.into_values().collect();
    // Stable sort keeps the alphabetical order from the map on ties.
    summaries.sort_by(|a, b| b.count.cmp(&a.count));
    summaries
}

pub fn build_report(
    first_year: i32,
    today: NaiveDate,
    records: &[DividendRecord],
    profiles: &[CompanyProfile],
) -> DividendResult<String> {
    let cards = scoring::rank_companies(records, profiles, first_year)?;
    let summaries = summarize_by_sector(records);
    let upcoming = calendar::upcoming_events(records, today, calendar::DEFAULT_UPCOMING_LIMIT);
    let last_year = first_year + SERIES_YEARS as i32 - 1;

    let mut output = String::new();

    let _ = writeln!(output, "# Casablanca Dividend Report");
    let _ = writeln!(
        output,
        "Generated on {} from distributions {}-{}",
        today, first_year, last_year
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Reliability Ranking (C-DRS)");

    if cards.is_empty() {
        let _ = writeln!(output, "No dividend history in this window.");
    } else {
        for (rank, card) in cards.iter().enumerate() {
            let payback = match (&card.payback, &card.payback_label) {
                (Some(payback), Some(label)) => format!("PRT {} ({})", payback.score, label.label),
                _ => "PRT n/a".to_string(),
            };
            let _ = writeln!(
                output,
                "{}. {} ({}, {}) C-DRS {} {} | {} | NDF {} {:.2}-{:.2} MAD, confidence {}%",
                rank + 1,
                card.company,
                card.ticker,
                card.sector,
                card.reliability.total,
                card.reliability_label.label,
                payback,
                card.forecast.year,
                card.forecast.div_min,
                card.forecast.div_max,
                card.forecast.confidence
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Sector Mix");

    if summaries.is_empty() {
        let _ = writeln!(output, "No distributions recorded.");
    } else {
        for summary in summaries.iter() {
            let _ = writeln!(
                output,
                "- {}: {} distributions, {:.2} MAD total (avg {:.2} MAD)",
                summary.sector, summary.count, summary.total_amount, summary.avg_amount
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Upcoming Events");

    if upcoming.is_empty() {
        let _ = writeln!(output, "No upcoming ex-dates or payments.");
    } else {
        for event in upcoming.iter() {
            let kind = match event.kind {
                EventKind::ExDate => "ex-date",
                EventKind::Payment => "payment",
            };
            let _ = writeln!(
                output,
                "- {} ({}) {} on {} in {} days [{}]: {:.2} MAD",
                event.record.company,
                event.record.ticker,
                kind,
                event.date,
                event.days_until,
                event.urgency.as_str(),
                event.record.amount
            );
        }
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ticker: &str, sector: &str, year: i32, amount: f64) -> DividendRecord {
        DividendRecord {
            ticker: ticker.to_string(),
            company: format!("{ticker} SA"),
            sector: sector.to_string(),
            year,
            ex_date: NaiveDate::from_ymd_opt(year, 6, 20),
            payment_date: NaiveDate::from_ymd_opt(year, 7, 10),
            amount,
        }
    }

    #[test]
    fn sectors_sorted_by_count() {
        let records = vec![
            record("ATW", "Banks", 2023, 15.0),
            record("BCP", "Banks", 2023, 9.0),
            record("IAM", "Telecommunications", 2023, 4.0),
        ];
        let summaries = summarize_by_sector(&records);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].sector, "Banks");
        assert_eq!(summaries[0].count, 2);
        assert!((summaries[0].total_amount - 24.0).abs() < 1e-9);
        assert!((summaries[0].avg_amount - 12.0).abs() < 1e-9);
    }

    #[test]
    fn sector_ties_fall_back_to_name() {
        let records = vec![
            record("MNG", "Mining", 2023, 40.0),
            record("CSR", "Agri-food", 2023, 5.0),
            record("CSR", "Agri-food", 2024, 5.5),
            record("SMI", "Mining", 2024, 60.0),
        ];
        let summaries = summarize_by_sector(&records);
        let sectors: Vec<&str> = summaries.iter().map(|s| s.sector.as_str()).collect();
        assert_eq!(sectors, vec!["Agri-food", "Mining"]);
        assert!((summaries[0].total_amount - 10.5).abs() < 1e-9);
        assert!((summaries[1].total_amount - 100.0).abs() < 1e-9);
        assert!((summaries[1].avg_amount - 50.0).abs() < 1e-9);
    }

    #[test]
    fn report_lists_ranking_sectors_and_events() {
        let mut records: Vec<DividendRecord> = (2020..=2024)
            .map(|year| record("CSR", "Agri-food", year, 5.0))
            .collect();
        records.push(record("MNG", "Mining", 2024, 40.0));
        let profiles = vec![CompanyProfile {
            ticker: "CSR".to_string(),
            prt: 12,
            beta: 0.58,
        }];
        let today = NaiveDate::from_ymd_opt(2024, 6, 18).unwrap();

        let report = build_report(2020, today, &records, &profiles).unwrap();
        assert!(report.starts_with("# Casablanca Dividend Report"));
        assert!(report.contains("1. CSR SA (CSR, Agri-food) C-DRS"));
        assert!(report.contains("PRT 82 (Excellent)"));
        assert!(report.contains("2. MNG SA (MNG, Mining)"));
        assert!(report.contains("PRT n/a"));
        assert!(report.contains("- Agri-food: 5 distributions, 25.00 MAD total (avg 5.00 MAD)"));
        assert!(report.contains("ex-date on 2024-06-20 in 2 days [imminent]"));
    }

    #[test]
    fn empty_report_has_placeholders() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let report = build_report(2020, today, &[], &[]).unwrap();
        assert!(report.contains("No dividend history in this window."));
        assert!(report.contains("No distributions recorded."));
        assert!(report.contains("No upcoming ex-dates or payments."));
    }
}
