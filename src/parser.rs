//! CSV decoder for bikeshare trip files.

use chrono::NaiveDateTime;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::error::DataLoadError;
use crate::trips::{City, Schema, TripRecord, TripTable};

/// Columns every city file must carry.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "Start Time",
    "Trip Duration",
    "Start Station",
    "End Station",
    "User Type",
];

const END_TIME: &str = "End Time";
const GENDER: &str = "Gender";
const BIRTH_YEAR: &str = "Birth Year";

static TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// A single row as it appears in the file. Unknown columns, such as the
/// unnamed index column some exports carry, are ignored.
#[derive(Debug, Deserialize)]
struct RawTrip {
    #[serde(rename = "Start Time")]
    start_time: String,
    #[serde(rename = "End Time", default)]
    end_time: Option<String>,
    #[serde(rename = "Trip Duration")]
    trip_duration: f64,
    #[serde(rename = "Start Station")]
    start_station: String,
    #[serde(rename = "End Station")]
    end_station: String,
    #[serde(rename = "User Type", default)]
    user_type: Option<String>,
    #[serde(rename = "Gender", default)]
    gender: Option<String>,
    // stored as a float in the published files, e.g. "1992.0"
    #[serde(rename = "Birth Year", default)]
    birth_year: Option<f64>,
}

/// Parses a date-time cell using the formats seen across the city exports.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

/// Decodes a trip table for `city` from CSV bytes.
///
/// # Errors
///
/// Returns [`DataLoadError::MissingColumn`] if a required column is absent,
/// [`DataLoadError::InvalidTimestamp`] if a start or end time cannot be
/// parsed, [`DataLoadError::EmptyField`] for a blank station,
/// [`DataLoadError::InvalidDuration`] for a negative or non-finite duration
/// and [`DataLoadError::Csv`] for any other malformed row.
pub fn parse_trips<R: Read>(city: City, reader: R) -> Result<TripTable, DataLoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let has_column = |name: &str| headers.iter().any(|h| h == name);

    if let Some(missing) = REQUIRED_COLUMNS.iter().find(|c| !has_column(c)) {
        return Err(DataLoadError::MissingColumn(*missing));
    }

    let schema = Schema {
        has_end_time: has_column(END_TIME),
        has_gender: has_column(GENDER),
        has_birth_year: has_column(BIRTH_YEAR),
    };
    debug!(?schema, "Detected optional columns");

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let raw: RawTrip = record.deserialize(Some(&headers))?;

        let start_time =
            parse_timestamp(&raw.start_time).ok_or_else(|| DataLoadError::InvalidTimestamp {
                line,
                value: raw.start_time.clone(),
            })?;

        let end_time = match raw.end_time.as_deref().filter(|v| !v.is_empty()) {
            Some(value) => Some(parse_timestamp(value).ok_or_else(|| {
                DataLoadError::InvalidTimestamp {
                    line,
                    value: value.to_string(),
                }
            })?),
            None => None,
        };

        if !raw.trip_duration.is_finite() || raw.trip_duration < 0.0 {
            return Err(DataLoadError::InvalidDuration {
                line,
                value: raw.trip_duration,
            });
        }
        let start_station = required(raw.start_station, line, "Start Station")?;
        let end_station = required(raw.end_station, line, "End Station")?;

        let trip = TripRecord::new(
            start_time,
            raw.trip_duration,
            start_station,
            end_station,
            non_empty(raw.user_type),
        )
        .with_end_time(end_time)
        .with_gender(non_empty(raw.gender))
        .with_birth_year(raw.birth_year.map(|y| y.trunc() as i32));

        rows.push(trip);
    }

    Ok(TripTable::new(city, schema, rows))
}

/// Loads `<data_dir>/<city file>` into memory.
#[tracing::instrument(skip(data_dir), fields(data_dir = %data_dir.display()))]
pub fn load_city(data_dir: &Path, city: City) -> Result<TripTable, DataLoadError> {
    let path = data_dir.join(city.file_name());
    let file = File::open(&path).map_err(|source| DataLoadError::Io {
        path: path.clone(),
        source,
    })?;

    let table = parse_trips(city, file)?;
    info!(rows = table.len(), path = %path.display(), "Trip data loaded");
    Ok(table)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn required(value: String, line: u64, column: &'static str) -> Result<String, DataLoadError> {
    if value.is_empty() {
        Err(DataLoadError::EmptyField { line, column })
    } else {
        Ok(value)
    }
}
