pub type DividendResult<T> = Result<T, DividendError>;

#[derive(Debug, thiserror::Error)]
pub enum DividendError {
    #[error("invalid dividend series: {0}")]
    InvalidSeries(String),

    #[error("unable to parse date '{0}'")]
    InvalidDate(String),

    #[error("invalid amount '{0}'")]
    InvalidAmount(String),

    #[error("month index {0} is out of range (expected 0..=11)")]
    InvalidMonth(u32),

    #[error("invalid dividend record: {0}")]
    InvalidRecord(String),

    #[error("no dividend history for ticker {0}")]
    UnknownTicker(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}
