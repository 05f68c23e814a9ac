use crate::analyzers::types::TravelTimes;
use crate::analyzers::utility::FrequencyTable;
use crate::error::StatsError;
use crate::trips::TripTable;

const AGGREGATOR: &str = "time of travel";

/// Converts a 0–23 hour into a 12-hour clock label.
///
/// | Hour  | Label     |
/// |-------|-----------|
/// | 0     | 12AM      |
/// | 1–12  | 1AM–12AM  |
/// | 13–23 | 1PM–11PM  |
///
/// Hour 12 keeps the AM suffix of the published reports, so noon and
/// midnight share a label; `most_common_hour` tells them apart.
pub fn hour_label(hour: u32) -> String {
    match hour % 24 {
        0 => "12AM".into(),
        h @ 1..=12 => format!("{h}AM"),
        h => format!("{}PM", h - 12),
    }
}

/// Most common month, weekday and start hour.
///
/// # Errors
///
/// Returns [`StatsError::EmptyDataset`] if `table` has no rows.
pub fn summarize(table: &TripTable) -> Result<TravelTimes, StatsError> {
    let mut months = FrequencyTable::new();
    let mut weekdays = FrequencyTable::new();
    let mut hours = FrequencyTable::new();

    for trip in table.iter() {
        months.add(trip.month());
        weekdays.add(trip.weekday());
        hours.add(trip.hour());
    }

    let empty = || StatsError::EmptyDataset {
        aggregator: AGGREGATOR,
    };
    let month = months.mode().ok_or_else(empty)?.value;
    let weekday = weekdays.mode().ok_or_else(empty)?.value;
    let hour = hours.mode().ok_or_else(empty)?.value;

    Ok(TravelTimes {
        most_common_month: month,
        most_common_weekday: weekday,
        most_common_hour: hour,
        most_common_hour_local: hour_label(hour),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trips::tests::{at, trip};
    use crate::trips::{City, Schema};
    use chrono::{Month, Weekday};

    #[test]
    fn test_hour_label_boundaries() {
        assert_eq!(hour_label(0), "12AM");
        assert_eq!(hour_label(1), "1AM");
        assert_eq!(hour_label(11), "11AM");
        assert_eq!(hour_label(12), "12AM");
        assert_eq!(hour_label(13), "1PM");
        assert_eq!(hour_label(17), "5PM");
        assert_eq!(hour_label(23), "11PM");
    }

    #[test]
    fn test_summarize_modes() {
        let table = TripTable::new(
            City::Chicago,
            Schema::default(),
            vec![
                trip(at(2017, 3, 6, 17), 60.0, "A", "B"),  // Monday
                trip(at(2017, 3, 7, 17), 60.0, "A", "B"),  // Tuesday
                trip(at(2017, 3, 14, 8), 60.0, "A", "B"),  // Tuesday
                trip(at(2017, 4, 4, 8), 60.0, "A", "B"),   // Tuesday
                trip(at(2017, 4, 10, 17), 60.0, "A", "B"), // Monday
            ],
        );

        let times = summarize(&table).unwrap();
        assert_eq!(times.most_common_month, Month::March);
        assert_eq!(times.most_common_weekday, Weekday::Tue);
        assert_eq!(times.most_common_hour, 17);
        assert_eq!(times.most_common_hour_local, "5PM");
    }

    #[test]
    fn test_ties_go_to_first_seen() {
        let table = TripTable::new(
            City::Chicago,
            Schema::default(),
            vec![
                trip(at(2017, 2, 7, 9), 60.0, "A", "B"),
                trip(at(2017, 1, 2, 0), 60.0, "A", "B"),
            ],
        );

        let times = summarize(&table).unwrap();
        assert_eq!(times.most_common_month, Month::February);
        assert_eq!(times.most_common_weekday, Weekday::Tue);
        assert_eq!(times.most_common_hour, 9);
    }

    #[test]
    fn test_midnight_is_labelled() {
        let table = TripTable::new(
            City::Chicago,
            Schema::default(),
            vec![trip(at(2017, 1, 2, 0), 60.0, "A", "B")],
        );
        assert_eq!(summarize(&table).unwrap().most_common_hour_local, "12AM");
    }

    #[test]
    fn test_noon_keeps_numeric_hour() {
        let table = TripTable::new(
            City::Chicago,
            Schema::default(),
            vec![trip(at(2017, 1, 2, 12), 60.0, "A", "B")],
        );
        let times = summarize(&table).unwrap();
        assert_eq!(times.most_common_hour, 12);
        assert_eq!(times.most_common_hour_local, "12AM");
    }

    #[test]
    fn test_empty_table() {
        let table = TripTable::new(City::Chicago, Schema::default(), vec![]);
        assert_eq!(
            summarize(&table),
            Err(StatsError::EmptyDataset {
                aggregator: "time of travel"
            })
        );
    }
}
