use std::collections::{BTreeMap, HashSet};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{Datelike, Duration, NaiveDate};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::dates;
use crate::error::{DividendError, DividendResult};
use crate::models::{CompanyProfile, DividendRecord};

const PROFILES_FILE: &str = "companies.json";
const UNCLASSIFIED_SECTOR: &str = "Unclassified";

/// Where dividend records and company profiles come from.
#[async_trait]
pub trait DividendSource: Send + Sync {
    /// Records stored for `year`. A year without data is an empty list.
    ///
    /// A record keeps the year it was stored under even when its `year`
    /// field or ex-date points elsewhere.
    async fn load_year(&self, year: i32) -> DividendResult<Vec<DividendRecord>>;

    async fn load_profiles(&self) -> DividendResult<Vec<CompanyProfile>>;
}

pub async fn load_years(
    source: &dyn DividendSource,
    years: RangeInclusive<i32>,
) -> DividendResult<Vec<DividendRecord>> {
    let mut records = Vec::new();
    for year in years.clone() {
        records.extend(source.load_year(year).await?);
    }
    info!(
        first_year = years.start(),
        last_year = years.end(),
        count = records.len(),
        "loaded dividend records"
    );
    Ok(records)
}

/// Reads `dividends_<year>.json` and `companies.json` from a directory.
#[derive(Debug, Clone)]
pub struct JsonDirSource {
    dir: PathBuf,
}

impl JsonDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn year_path(&self, year: i32) -> PathBuf {
        self.dir.join(format!("dividends_{year}.json"))
    }

    pub fn profiles_path(&self) -> PathBuf {
        self.dir.join(PROFILES_FILE)
    }

    async fn read_optional(path: &Path) -> DividendResult<Option<String>> {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "data file missing, treating as empty");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn write_year(&self, year: i32, records: &[DividendRecord]) -> DividendResult<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let content = serde_json::to_string_pretty(records)?;
        tokio::fs::write(self.year_path(year), content).await?;
        Ok(())
    }

    pub async fn write_profiles(&self, profiles: &[CompanyProfile]) -> DividendResult<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let content = serde_json::to_string_pretty(profiles)?;
        tokio::fs::write(self.profiles_path(), content).await?;
        Ok(())
    }
}

#[async_trait]
impl DividendSource for JsonDirSource {
    async fn load_year(&self, year: i32) -> DividendResult<Vec<DividendRecord>> {
        let path = self.year_path(year);
        match Self::read_optional(&path).await? {
            Some(content) => {
                let records = parse_year_file(&content, year)?;
                debug!(year, count = records.len(), "parsed dividend file");
                Ok(records)
            }
            None => Ok(Vec::new()),
        }
    }

    async fn load_profiles(&self) -> DividendResult<Vec<CompanyProfile>> {
        match Self::read_optional(&self.profiles_path()).await? {
            Some(content) => Ok(serde_json::from_str(&content)?),
            None => Ok(Vec::new()),
        }
    }
}

/// Fixture-backed source.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    pub records: Vec<DividendRecord>,
    pub profiles: Vec<CompanyProfile>,
}

#[async_trait]
impl DividendSource for InMemorySource {
    async fn load_year(&self, year: i32) -> DividendResult<Vec<DividendRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|record| record.year == year)
            .cloned()
            .collect())
    }

    async fn load_profiles(&self) -> DividendResult<Vec<CompanyProfile>> {
        Ok(self.profiles.clone())
    }
}

/// A record as found in yearly files, whose field names drift between years.
#[derive(Debug, Default, Deserialize)]
struct RawRecord {
    #[serde(default, alias = "symbol", alias = "code")]
    ticker: Option<String>,
    #[serde(default, alias = "name", alias = "companyName", alias = "societe")]
    company: Option<String>,
    #[serde(default, alias = "secteur")]
    sector: Option<String>,
    #[serde(default, alias = "annee")]
    year: Option<Value>,
    #[serde(
        default,
        rename = "exDate",
        alias = "exdate",
        alias = "ex_date",
        alias = "detachmentDate",
        alias = "dateDetachement"
    )]
    ex_date: Option<String>,
    #[serde(
        default,
        rename = "paymentDate",
        alias = "paymentdate",
        alias = "payment_date",
        alias = "datePaiement"
    )]
    payment_date: Option<String>,
    #[serde(default, alias = "dividend", alias = "montant", alias = "dividende")]
    amount: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum YearFile {
    List(Vec<RawRecord>),
    Wrapped {
        #[serde(alias = "data")]
        dividends: Vec<RawRecord>,
    },
}

pub fn parse_year_file(content: &str, file_year: i32) -> DividendResult<Vec<DividendRecord>> {
    let raw = match serde_json::from_str::<YearFile>(content)? {
        YearFile::List(rows) => rows,
        YearFile::Wrapped { dividends } => dividends,
    };
    raw.into_iter()
        .map(|row| normalize(row, Some(file_year)))
        .collect()
}

fn optional_date(value: Option<String>) -> DividendResult<Option<NaiveDate>> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => dates::parse_date(text).map(Some),
    }
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Amounts are JSON numbers or strings such as `"12.50"` / `"12,50"`.
pub fn parse_amount(value: &Value) -> DividendResult<f64> {
    let amount = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    };
    match amount {
        Some(amount) if amount.is_finite() && amount >= 0.0 => Ok(amount),
        _ => Err(DividendError::InvalidAmount(value.to_string())),
    }
}

fn parse_year(value: &Value) -> DividendResult<i32> {
    let year = match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    };
    year.and_then(|year| i32::try_from(year).ok())
        .ok_or_else(|| DividendError::InvalidRecord(format!("invalid year {value}")))
}

/// `file_year` is the year of the file the row came from, if any.
fn normalize(raw: RawRecord, file_year: Option<i32>) -> DividendResult<DividendRecord> {
    let ticker = optional_text(raw.ticker)
        .map(|ticker| ticker.to_uppercase())
        .ok_or_else(|| DividendError::InvalidRecord("missing ticker".to_string()))?;
    let amount = match &raw.amount {
        Some(value) => parse_amount(value)?,
        None => {
            return Err(DividendError::InvalidRecord(format!(
                "missing amount for {ticker}"
            )))
        }
    };
    let ex_date = optional_date(raw.ex_date)?;
    let payment_date = optional_date(raw.payment_date)?;
    let year = match &raw.year {
        Some(value) => parse_year(value)?,
        None => ex_date
            .map(|date| date.year())
            .or(file_year)
            .ok_or_else(|| {
                DividendError::InvalidRecord(format!("missing year and ex-date for {ticker}"))
            })?,
    };

    Ok(DividendRecord {
        company: optional_text(raw.company).unwrap_or_else(|| ticker.clone()),
        sector: optional_text(raw.sector).unwrap_or_else(|| UNCLASSIFIED_SECTOR.to_string()),
        ticker,
        year,
        ex_date,
        payment_date,
        amount,
    })
}

fn dedup_key(record: &DividendRecord) -> (String, Option<NaiveDate>, u64) {
    (record.ticker.clone(), record.ex_date, record.amount.to_bits())
}

/// Merges CSV rows into the yearly JSON files, skipping records already present.
pub async fn import_csv(csv_path: &Path, target: &JsonDirSource) -> DividendResult<usize> {
    #[derive(Deserialize)]
    struct CsvRow {
        ticker: String,
        company: Option<String>,
        sector: Option<String>,
        year: Option<String>,
        ex_date: Option<String>,
        payment_date: Option<String>,
        amount: String,
    }

    let mut reader = csv::Reader::from_path(csv_path)?;
    let mut by_year: BTreeMap<i32, Vec<DividendRecord>> = BTreeMap::new();

    for result in reader.deserialize::<CsvRow>() {
        let row = result?;
        let raw = RawRecord {
            ticker: Some(row.ticker),
            company: row.company,
            sector: row.sector,
            year: optional_text(row.year).map(Value::String),
            ex_date: row.ex_date,
            payment_date: row.payment_date,
            amount: Some(Value::String(row.amount)),
        };
        let record = normalize(raw, None)?;
        by_year.entry(record.year).or_default().push(record);
    }

    let mut inserted = 0usize;
    for (year, incoming) in by_year {
        let mut records = target.load_year(year).await?;
        let mut seen: HashSet<_> = records.iter().map(dedup_key).collect();
        let before = records.len();

        for record in incoming {
            if seen.insert(dedup_key(&record)) {
                records.push(record);
            }
        }

        let added = records.len() - before;
        if added > 0 {
            records.sort_by(|a, b| {
                a.ex_date
                    .cmp(&b.ex_date)
                    .then_with(|| a.ticker.cmp(&b.ticker))
            });
            target.write_year(year, &records).await?;
        }
        debug!(year, added, "merged imported records");
        inserted += added;
    }

    Ok(inserted)
}

struct SeedCompany {
    ticker: &'static str,
    company: &'static str,
    sector: &'static str,
    ex_month: u32,
    ex_day: u32,
    prt: u32,
    beta: f64,
    amounts: [f64; 5],
}

const SEED_FIRST_YEAR: i32 = 2020;

const SEED_COMPANIES: &[SeedCompany] = &[
    SeedCompany {
        ticker: "ATW",
        company: "Attijariwafa Bank",
        sector: "Banks",
        ex_month: 7,
        ex_day: 3,
        prt: 18,
        beta: 0.92,
        amounts: [13.5, 11.0, 15.0, 15.0, 17.0],
    },
    SeedCompany {
        ticker: "BCP",
        company: "Banque Centrale Populaire",
        sector: "Banks",
        ex_month: 7,
        ex_day: 12,
        prt: 27,
        beta: 0.85,
        amounts: [8.0, 0.0, 8.0, 8.5, 9.5],
    },
    SeedCompany {
        ticker: "IAM",
        company: "Maroc Telecom",
        sector: "Telecommunications",
        ex_month: 6,
        ex_day: 3,
        prt: 41,
        beta: 0.64,
        amounts: [6.58, 4.01, 4.78, 4.01, 4.41],
    },
    SeedCompany {
        ticker: "LHM",
        company: "LafargeHolcim Maroc",
        sector: "Building Materials",
        ex_month: 6,
        ex_day: 20,
        prt: 22,
        beta: 1.05,
        amounts: [66.0, 40.0, 66.0, 66.0, 75.0],
    },
    SeedCompany {
        ticker: "CSR",
        company: "Cosumar",
        sector: "Agri-food",
        ex_month: 6,
        ex_day: 27,
        prt: 12,
        beta: 0.58,
        amounts: [5.0, 5.0, 5.0, 5.5, 6.0],
    },
    SeedCompany {
        ticker: "MNG",
        company: "Managem",
        sector: "Mining",
        ex_month: 7,
        ex_day: 18,
        prt: 63,
        beta: 1.34,
        amounts: [0.0, 0.0, 30.0, 0.0, 40.0],
    },
    SeedCompany {
        ticker: "TQM",
        company: "Taqa Morocco",
        sector: "Utilities",
        ex_month: 7,
        ex_day: 8,
        prt: 15,
        beta: 0.71,
        amounts: [40.0, 42.0, 48.0, 55.0, 60.0],
    },
    SeedCompany {
        ticker: "WAA",
        company: "Wafa Assurance",
        sector: "Insurance",
        ex_month: 6,
        ex_day: 12,
        prt: 35,
        beta: 0.88,
        amounts: [120.0, 50.0, 180.0, 200.0, 220.0],
    },
];

fn seed_records(year: i32) -> DividendResult<Vec<DividendRecord>> {
    let offset = (year - SEED_FIRST_YEAR) as usize;
    let mut records = Vec::new();

    for company in SEED_COMPANIES {
        let amount = company.amounts[offset];
        if amount <= 0.0 {
            continue;
        }
        let ex_date = NaiveDate::from_ymd_opt(year, company.ex_month, company.ex_day)
            .ok_or_else(|| {
                DividendError::InvalidRecord(format!("bad seed date for {}", company.ticker))
            })?;
        records.push(DividendRecord {
            ticker: company.ticker.to_string(),
            company: company.company.to_string(),
            sector: company.sector.to_string(),
            year,
            ex_date: Some(ex_date),
            payment_date: Some(ex_date + Duration::days(21)),
            amount,
        });
    }

    Ok(records)
}

/// Writes a realistic sample dataset: five yearly files plus company profiles.
pub async fn seed(target: &JsonDirSource) -> DividendResult<usize> {
    let mut written = 0usize;
    for year in SEED_FIRST_YEAR..SEED_FIRST_YEAR + 5 {
        let records = seed_records(year)?;
        written += records.len();
        target.write_year(year, &records).await?;
    }

    let profiles: Vec<CompanyProfile> = SEED_COMPANIES
        .iter()
        .map(|company| CompanyProfile {
            ticker: company.ticker.to_string(),
            prt: company.prt,
            beta: company.beta,
        })
        .collect();
    target.write_profiles(&profiles).await?;

    info!(records = written, dir = %target.dir.display(), "seed dataset written");
    Ok(written)
}
