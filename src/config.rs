use std::env;
use std::ops::RangeInclusive;
use std::path::PathBuf;

use anyhow::Context;

pub const DATA_DIR_VAR: &str = "DIVIDEND_DATA_DIR";
pub const FIRST_YEAR_VAR: &str = "DIVIDEND_FIRST_YEAR";

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_FIRST_YEAR: i32 = 2020;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub data_dir: PathBuf,
    /// Oldest year of the five-year scoring window.
    pub first_year: i32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            first_year: DEFAULT_FIRST_YEAR,
        }
    }
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let data_dir = lookup(DATA_DIR_VAR)
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let first_year = match lookup(FIRST_YEAR_VAR) {
            Some(value) => value
                .trim()
                .parse()
                .with_context(|| format!("{FIRST_YEAR_VAR} must be a year, got '{value}'"))?,
            None => defaults.first_year,
        };

        Ok(Self {
            data_dir,
            first_year,
        })
    }

    /// Distribution years fed into the scores.
    pub fn window(&self) -> RangeInclusive<i32> {
        self.first_year..=self.first_year + crate::models::SERIES_YEARS as i32 - 1
    }
}
