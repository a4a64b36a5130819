use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::Context;
use chrono::{Datelike, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use tracing::info;

use casablanca_dividends::calendar;
use casablanca_dividends::config::Settings;
use casablanca_dividends::data::{self, DividendSource, JsonDirSource};
use casablanca_dividends::dates;
use casablanca_dividends::logging::init_logger;
use casablanca_dividends::models::{CalendarCell, Scorecard};
use casablanca_dividends::report;
use casablanca_dividends::scoring;

#[derive(Parser)]
#[command(name = "casablanca-dividends")]
#[command(about = "Dividend scores and calendar for the Casablanca Stock Exchange", long_about = None)]
struct Cli {
    /// Directory holding dividends_<year>.json and companies.json
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a sample dataset into the data directory
    Seed,
    /// Merge dividend rows from a CSV file into the yearly JSON files
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Reliability, payback and forecast scores for one company
    Score {
        #[arg(long)]
        ticker: String,
        #[arg(long)]
        first_year: Option<i32>,
        #[arg(long)]
        json: bool,
    },
    /// Rank companies by reliability score
    Rank {
        #[arg(long)]
        first_year: Option<i32>,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Monday-first calendar of ex-dates and payments
    Calendar {
        #[arg(long)]
        year: i32,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: u32,
        #[arg(long)]
        sector: Option<String>,
        #[arg(long)]
        ticker: Option<String>,
    },
    /// Ex-date histogram for a year
    Distribution {
        #[arg(long)]
        year: i32,
        #[arg(long)]
        quarterly: bool,
    },
    /// Next ex-dates and payments
    Upcoming {
        /// Reference date (defaults to today)
        #[arg(long)]
        today: Option<String>,
        #[arg(long, default_value_t = calendar::DEFAULT_UPCOMING_LIMIT)]
        limit: usize,
    },
    /// Generate a markdown report
    Report {
        #[arg(long)]
        first_year: Option<i32>,
        #[arg(long)]
        today: Option<String>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

fn resolve_today(value: Option<&str>) -> anyhow::Result<NaiveDate> {
    match value {
        Some(text) => dates::parse_date(text).context("--today must be a date"),
        None => Ok(Utc::now().date_naive()),
    }
}

fn print_scorecard(card: &Scorecard) {
    let reliability = &card.reliability;
    let forecast = &card.forecast;
    let values: Vec<String> = card
        .series
        .values()
        .iter()
        .map(|value| format!("{value:.2}"))
        .collect();

    println!("{} ({}) - {}", card.company, card.ticker, card.sector);
    println!(
        "Distributions {}-{}: {}",
        card.series.first_year(),
        card.series.last_year(),
        values.join(" / ")
    );
    println!();
    println!(
        "C-DRS {}/100 - {}",
        reliability.total, card.reliability_label.label
    );
    println!(
        "  regularity {} | growth {} | stability {} | magnitude {}",
        reliability.regularity, reliability.growth, reliability.stability, reliability.magnitude
    );
    println!("  {}", card.reliability_label.interpretation);

    match (&card.payback, &card.payback_label) {
        (Some(payback), Some(label)) => {
            println!(
                "PRT {}/100 - {} ({} days, {})",
                payback.score,
                label.label,
                payback.prt_days,
                scoring::payback_days_label(payback.prt_days)
            );
            println!("  {}", label.interpretation);
        }
        _ => println!("PRT unavailable: no company profile"),
    }
    if let Some(beta) = card.beta {
        println!("Beta {beta:.2}");
    }

    println!(
        "NDF {}: {:.2} MAD (range {:.2}-{:.2}), trend {:+.1}%",
        forecast.year, forecast.div_probable, forecast.div_min, forecast.div_max, forecast.tcam
    );
    println!(
        "  confidence {}% - {} {}",
        forecast.confidence,
        card.forecast_label.label,
        "*".repeat(card.forecast_stars as usize)
    );
    println!("  {}", card.forecast_label.interpretation);
    println!("  estimated ex-date: {} (placeholder)", forecast.ex_date_window);
}

fn render_grid(grid: &[Option<CalendarCell>]) -> String {
    let mut output = String::from("Mo  Tu  We  Th  Fr  Sa  Su\n");
    for (index, cell) in grid.iter().enumerate() {
        let text = match cell {
            Some(cell) if !cell.events.is_empty() => format!("{:>2}*", cell.day),
            Some(cell) => format!("{:>2} ", cell.day),
            None => "   ".to_string(),
        };
        output.push_str(&text);
        output.push(if index % 7 == 6 { '\n' } else { ' ' });
    }
    if !output.ends_with('\n') {
        output.push('\n');
    }
    output
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger()?;
    let cli = Cli::parse();
    let mut settings = Settings::from_env()?;
    if let Some(dir) = cli.data_dir {
        settings.data_dir = dir;
    }
    let source = JsonDirSource::new(&settings.data_dir);

    match cli.command {
        Commands::Seed => {
            let written = data::seed(&source)
                .await
                .context("failed to write seed data")?;
            println!(
                "Seed data written: {written} distributions in {}.",
                settings.data_dir.display()
            );
        }
        Commands::Import { csv } => {
            let inserted = data::import_csv(&csv, &source)
                .await
                .with_context(|| format!("failed to import {}", csv.display()))?;
            println!("Inserted {inserted} distributions from {}.", csv.display());
        }
        Commands::Score {
            ticker,
            first_year,
            json,
        } => {
            if let Some(year) = first_year {
                settings.first_year = year;
            }
            let first_year = settings.first_year;
            let records = data::load_years(&source, settings.window()).await?;
            let profiles = source.load_profiles().await?;
            let card = scoring::company_scorecard(&ticker, &records, &profiles, first_year)?;
            info!(ticker = %card.ticker, total = card.reliability.total, "scored company");

            if json {
                println!("{}", serde_json::to_string_pretty(&card)?);
            } else {
                print_scorecard(&card);
            }
        }
        Commands::Rank { first_year, limit } => {
            if let Some(year) = first_year {
                settings.first_year = year;
            }
            let first_year = settings.first_year;
            let records = data::load_years(&source, settings.window()).await?;
            let profiles = source.load_profiles().await?;
            let cards = scoring::rank_companies(&records, &profiles, first_year)?;

            if cards.is_empty() {
                println!("No dividend history found from {first_year}.");
                return Ok(());
            }

            println!("Top companies by C-DRS:");
            for card in cards.iter().take(limit) {
                println!(
                    "- {} ({}, {}) C-DRS {} {} | NDF {:.2} MAD, confidence {}%",
                    card.company,
                    card.ticker,
                    card.sector,
                    card.reliability.total,
                    card.reliability_label.label,
                    card.forecast.div_probable,
                    card.forecast.confidence
                );
            }
        }
        Commands::Calendar {
            year,
            month,
            sector,
            ticker,
        } => {
            // Payments can spill into the following year.
            let records = data::load_years(&source, year - 1..=year).await?;
            let records = calendar::filter_records(&records, sector.as_deref(), ticker.as_deref());
            let grid = calendar::build_month_grid(&records, year, month - 1)?;

            let mut output = render_grid(&grid);
            for cell in grid.iter().flatten().filter(|cell| !cell.events.is_empty()) {
                let date = NaiveDate::from_ymd_opt(year, month, cell.day);
                for event in &cell.events {
                    let kind = if event.ex_date == date {
                        "ex-date"
                    } else {
                        "payment"
                    };
                    let _ = writeln!(
                        output,
                        "{:>2}: {} ({}) {} {:.2} MAD",
                        cell.day, event.company, event.ticker, kind, event.amount
                    );
                }
            }
            print!("{output}");
        }
        Commands::Distribution { year, quarterly } => {
            let records = source.load_year(year).await?;
            let buckets = if quarterly {
                calendar::distribution_by_quarter(&records, year)
            } else {
                calendar::distribution_by_month(&records, year)
            };

            for bucket in &buckets {
                let bar = "#".repeat((bucket.height_percent / 5.0).round() as usize);
                println!("{:<4}{:>3} {}", bucket.label, bucket.count, bar);
            }
        }
        Commands::Upcoming { today, limit } => {
            let today = resolve_today(today.as_deref())?;
            let records = data::load_years(&source, today.year() - 1..=today.year() + 1).await?;
            let upcoming = calendar::upcoming_events(&records, today, limit);

            if upcoming.is_empty() {
                println!("No upcoming ex-dates or payments after {today}.");
                return Ok(());
            }

            for event in &upcoming {
                println!(
                    "- {} {} ({}) {:?} in {} days [{}]: {:.2} MAD",
                    event.date,
                    event.record.company,
                    event.record.ticker,
                    event.kind,
                    event.days_until,
                    event.urgency.as_str(),
                    event.record.amount
                );
            }
        }
        Commands::Report {
            first_year,
            today,
            out,
        } => {
            if let Some(year) = first_year {
                settings.first_year = year;
            }
            let first_year = settings.first_year;
            let today = resolve_today(today.as_deref())?;
            let records = data::load_years(&source, settings.window()).await?;
            let profiles = source.load_profiles().await?;
            let report = report::build_report(first_year, today, &records, &profiles)?;
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
