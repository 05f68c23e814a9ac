//! Trip records, the in-memory trip table and the city catalogue.

use chrono::{Datelike, Month, NaiveDateTime, Timelike, Weekday};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::UnknownCity;

/// Cities with a published trip file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum City {
    Chicago,
    NewYorkCity,
    Washington,
}

/// Accepted spellings, matched after trimming and lowercasing.
static CITY_ALIASES: &[(&str, City)] = &[
    ("chicago", City::Chicago),
    ("new york city", City::NewYorkCity),
    ("new_york_city", City::NewYorkCity),
    ("nyc", City::NewYorkCity),
    ("new york", City::NewYorkCity),
    ("washington", City::Washington),
    ("washington dc", City::Washington),
    ("washington d.c", City::Washington),
];

impl City {
    pub fn as_str(&self) -> &'static str {
        match self {
            City::Chicago => "chicago",
            City::NewYorkCity => "new_york_city",
            City::Washington => "washington",
        }
    }

    /// Name of the trip file for this city inside the data directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            City::Chicago => "chicago.csv",
            City::NewYorkCity => "new_york_city.csv",
            City::Washington => "washington.csv",
        }
    }
}

impl fmt::Display for City {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for City {
    type Err = UnknownCity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        CITY_ALIASES
            .iter()
            .find(|(alias, _)| *alias == key)
            .map(|(_, city)| *city)
            .ok_or_else(|| UnknownCity(s.trim().to_string()))
    }
}

/// Optional columns a city's file advertises. Fixed for the whole table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub has_end_time: bool,
    pub has_gender: bool,
    pub has_birth_year: bool,
}

/// One bike trip. Derived time fields are computed from `start_time` on
/// construction and cannot drift from it.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRecord {
    start_time: NaiveDateTime,
    end_time: Option<NaiveDateTime>,
    trip_duration: f64,
    start_station: String,
    end_station: String,
    user_type: Option<String>,
    gender: Option<String>,
    birth_year: Option<i32>,

    month: Month,
    weekday: Weekday,
    hour: u32,
}

impl TripRecord {
    pub fn new(
        start_time: NaiveDateTime,
        trip_duration: f64,
        start_station: impl Into<String>,
        end_station: impl Into<String>,
        user_type: Option<String>,
    ) -> Self {
        // month() is always 1..=12
        let month = Month::try_from(start_time.month() as u8).unwrap_or(Month::January);

        TripRecord {
            start_time,
            end_time: None,
            trip_duration,
            start_station: start_station.into(),
            end_station: end_station.into(),
            user_type,
            gender: None,
            birth_year: None,
            month,
            weekday: start_time.weekday(),
            hour: start_time.hour(),
        }
    }

    pub fn with_end_time(mut self, end_time: Option<NaiveDateTime>) -> Self {
        self.end_time = end_time;
        self
    }

    pub fn with_gender(mut self, gender: Option<String>) -> Self {
        self.gender = gender;
        self
    }

    pub fn with_birth_year(mut self, birth_year: Option<i32>) -> Self {
        self.birth_year = birth_year;
        self
    }

    pub fn start_time(&self) -> NaiveDateTime {
        self.start_time
    }

    pub fn end_time(&self) -> Option<NaiveDateTime> {
        self.end_time
    }

    pub fn trip_duration(&self) -> f64 {
        self.trip_duration
    }

    pub fn start_station(&self) -> &str {
        &self.start_station
    }

    pub fn end_station(&self) -> &str {
        &self.end_station
    }

    pub fn user_type(&self) -> Option<&str> {
        self.user_type.as_deref()
    }

    pub fn gender(&self) -> Option<&str> {
        self.gender.as_deref()
    }

    pub fn birth_year(&self) -> Option<i32> {
        self.birth_year
    }

    pub fn month(&self) -> Month {
        self.month
    }

    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    /// Hour of day, 0 to 23.
    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn month_name(&self) -> &'static str {
        self.month.name()
    }

    pub fn weekday_name(&self) -> &'static str {
        weekday_name(self.weekday)
    }
}

/// Full English name of a weekday, e.g. `"Monday"`.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// An ordered set of trips for one city.
///
/// Rows are shared behind `Arc`, so narrowing a table copies pointers and
/// never touches the table it was derived from.
#[derive(Debug, Clone)]
pub struct TripTable {
    city: City,
    schema: Schema,
    rows: Vec<Arc<TripRecord>>,
}

impl TripTable {
    pub fn new(city: City, schema: Schema, rows: Vec<TripRecord>) -> Self {
        TripTable {
            city,
            schema,
            rows: rows.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn city(&self) -> City {
        self.city
    }

    pub fn schema(&self) -> Schema {
        self.schema
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TripRecord> {
        self.rows.iter().map(Arc::as_ref)
    }

    pub fn get(&self, index: usize) -> Option<&TripRecord> {
        self.rows.get(index).map(Arc::as_ref)
    }

    /// New table with the rows matching `keep`, in their original order.
    pub(crate) fn retain_view(&self, keep: impl Fn(&TripRecord) -> bool) -> TripTable {
        TripTable {
            city: self.city,
            schema: self.schema,
            rows: self.rows.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }

    /// New table holding rows `start..end`, clamped to the table length.
    pub(crate) fn slice_view(&self, start: usize, end: usize) -> TripTable {
        let end = end.min(self.rows.len());
        let start = start.min(end);
        TripTable {
            city: self.city,
            schema: self.schema,
            rows: self.rows[start..end].to_vec(),
        }
    }
}
