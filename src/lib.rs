//! Dividend tracking for the Casablanca Stock Exchange: per-year data
//! loading, C-DRS / PRT / NDF scoring and calendar aggregation.

pub mod calendar;
pub mod config;
pub mod data;
pub mod dates;
pub mod error;
pub mod logging;
pub mod models;
pub mod report;
pub mod scoring;

pub use error::{DividendError, DividendResult};
