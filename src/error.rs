//! Error types shared across the load, filter and aggregation stages.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// A city's trip file could not be turned into a [`crate::trips::TripTable`].
///
/// Fatal for the current city selection only; the caller may pick again.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed trip data: {0}")]
    Csv(#[from] csv::Error),

    #[error("required column '{0}' is missing")]
    MissingColumn(&'static str),

    #[error("line {line}: cannot parse timestamp '{value}'")]
    InvalidTimestamp { line: u64, value: String },

    #[error("line {line}: '{column}' is empty")]
    EmptyField { line: u64, column: &'static str },

    #[error("line {line}: trip duration {value} is not a non-negative number of seconds")]
    InvalidDuration { line: u64, value: f64 },
}

/// An aggregator was handed a table with no rows.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatsError {
    #[error("no data for this selection ({aggregator})")]
    EmptyDataset { aggregator: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("unknown month '{0}', expected January to June")]
    UnknownMonth(String),

    #[error("unknown day '{0}', expected Monday to Sunday or 'all'")]
    UnknownWeekday(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no data for city '{0}', expected chicago, new york city or washington")]
pub struct UnknownCity(pub String);
