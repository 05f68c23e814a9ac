//! Summary types produced by the aggregators.

use chrono::{Month, Weekday};
use serde::{Serialize, Serializer};

use crate::analyzers::utility::ValueCount;
use crate::trips::weekday_name;

/// Busiest month, weekday and start hour of a trip table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TravelTimes {
    #[serde(serialize_with = "serialize_month")]
    pub most_common_month: Month,
    #[serde(serialize_with = "serialize_weekday")]
    pub most_common_weekday: Weekday,
    /// 0 to 23.
    pub most_common_hour: u32,
    /// 12-hour clock label, e.g. `"5PM"`.
    pub most_common_hour_local: String,
}

/// Ordered (start, end) station pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    pub start_station: String,
    pub end_station: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationPopularity {
    pub most_common_start_station: String,
    pub most_common_end_station: String,
    pub most_frequent_route: Route,
    pub most_frequent_route_count: usize,
}

/// A duration split into whole hours, whole minutes and remaining seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hms {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DurationSummary {
    pub total_duration_seconds: f64,
    pub mean_duration_seconds: f64,
    pub total: Hms,
    pub mean: Hms,
}

/// A summary that only exists when the city's file has the backing column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SchemaField<T> {
    /// Column not present in this city's data.
    Absent,
    Present(T),
}

impl<T> SchemaField<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, SchemaField::Absent)
    }

    pub fn as_present(&self) -> Option<&T> {
        match self {
            SchemaField::Present(value) => Some(value),
            SchemaField::Absent => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BirthYearStats {
    pub earliest_birth_year: i32,
    pub most_recent_birth_year: i32,
    pub most_common_birth_year: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Demographics {
    pub user_type_counts: Vec<ValueCount<String>>,
    #[serde(skip_serializing_if = "SchemaField::is_absent")]
    pub gender_counts: SchemaField<Vec<ValueCount<String>>>,
    /// `Present(None)` when the column exists but no row has a value.
    #[serde(skip_serializing_if = "SchemaField::is_absent")]
    pub birth_year_stats: SchemaField<Option<BirthYearStats>>,
}

fn serialize_month<S: Serializer>(month: &Month, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(month.name())
}

fn serialize_weekday<S: Serializer>(day: &Weekday, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(weekday_name(*day))
}
