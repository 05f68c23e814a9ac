//! Month / weekday narrowing of a trip table.

use chrono::{Month, Weekday};
use serde::Serialize;
use tracing::debug;

use crate::error::FilterError;
use crate::trips::{TripTable, weekday_name};

/// Months covered by the published trip files.
pub const FILTER_MONTHS: [Month; 6] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
];

pub const FILTER_WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Words that mean "do not filter on this field".
const NO_FILTER: &[&str] = &["all", "none", ""];

/// Optional month and optional weekday. Both present means both must match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub month: Option<Month>,
    pub weekday: Option<Weekday>,
}

impl FilterSelection {
    pub fn new(month: Option<Month>, weekday: Option<Weekday>) -> Self {
        FilterSelection { month, weekday }
    }

    /// Builds a selection from free-text input such as `"march"` and `"ALL"`.
    pub fn parse(month: Option<&str>, weekday: Option<&str>) -> Result<Self, FilterError> {
        Ok(FilterSelection {
            month: month.map(parse_month).transpose()?.flatten(),
            weekday: weekday.map(parse_weekday).transpose()?.flatten(),
        })
    }

    pub fn is_unfiltered(&self) -> bool {
        self.month.is_none() && self.weekday.is_none()
    }

    pub fn describe(&self) -> SelectionLabel {
        SelectionLabel {
            month: self.month.map(|m| m.name()),
            weekday: self.weekday.map(weekday_name),
        }
    }
}

/// Printable form of a [`FilterSelection`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionLabel {
    pub month: Option<&'static str>,
    pub weekday: Option<&'static str>,
}

/// Upper-cases the first letter and lower-cases the rest: `"mONDAY"` becomes `"Monday"`.
pub fn title_case(input: &str) -> String {
    let mut chars = input.trim().chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Resolves a month selection. `Ok(None)` means no month filter.
pub fn parse_month(input: &str) -> Result<Option<Month>, FilterError> {
    if is_no_filter(input) {
        return Ok(None);
    }
    let name = title_case(input);
    FILTER_MONTHS
        .iter()
        .find(|m| m.name() == name)
        .map(|m| Some(*m))
        .ok_or_else(|| FilterError::UnknownMonth(input.trim().to_string()))
}

/// Resolves a weekday selection. `Ok(None)` means no weekday filter.
pub fn parse_weekday(input: &str) -> Result<Option<Weekday>, FilterError> {
    if is_no_filter(input) {
        return Ok(None);
    }
    let name = title_case(input);
    FILTER_WEEKDAYS
        .iter()
        .find(|d| weekday_name(**d) == name)
        .map(|d| Some(*d))
        .ok_or_else(|| FilterError::UnknownWeekday(input.trim().to_string()))
}

fn is_no_filter(input: &str) -> bool {
    let key = input.trim().to_lowercase();
    NO_FILTER.contains(&key.as_str())
}

/// Returns the rows of `table` matching `selection`, in table order.
///
/// Always derived from the table passed in; the input is left untouched so
/// the next selection can start from the same unfiltered table.
#[tracing::instrument(skip(table), fields(rows = table.len()))]
pub fn apply(table: &TripTable, selection: &FilterSelection) -> TripTable {
    if selection.is_unfiltered() {
        return table.clone();
    }

    let filtered = table.retain_view(|trip| {
        selection.month.is_none_or(|m| trip.month_name() == m.name())
            && selection
                .weekday
                .is_none_or(|d| trip.weekday_name() == weekday_name(d))
    });

    debug!(kept = filtered.len(), "Filter applied");
    filtered
}
