use crate::analyzers::types::{DurationSummary, Hms};
use crate::analyzers::utility::mean;
use crate::error::StatsError;
use crate::trips::TripTable;

const AGGREGATOR: &str = "trip duration";

impl Hms {
    /// Splits a non-negative number of seconds; the seconds part is rounded
    /// to 2 decimals.
    pub fn from_seconds(total: f64) -> Self {
        let seconds = total % 60.0;
        Hms {
            hours: (total / 3600.0).floor() as u64,
            minutes: ((total % 3600.0) / 60.0).floor() as u64,
            seconds: (seconds * 100.0).round() / 100.0,
        }
    }
}

/// Total and mean trip duration.
///
/// # Errors
///
/// Returns [`StatsError::EmptyDataset`] if `table` has no rows.
pub fn summarize(table: &TripTable) -> Result<DurationSummary, StatsError> {
    let total: f64 = table.iter().map(|t| t.trip_duration()).sum();
    let average =
        mean(table.iter().map(|t| t.trip_duration())).ok_or(StatsError::EmptyDataset {
            aggregator: AGGREGATOR,
        })?;

    Ok(DurationSummary {
        total_duration_seconds: total,
        mean_duration_seconds: average,
        total: Hms::from_seconds(total),
        mean: Hms::from_seconds(average),
    })
}
