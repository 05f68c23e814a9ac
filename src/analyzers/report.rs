use anyhow::Result;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::analyzers::types::{Demographics, DurationSummary, StationPopularity, TravelTimes};
use crate::analyzers::{demographics, duration, stations, time_of_travel};
use crate::error::StatsError;
use crate::filter::{self, FilterSelection, SelectionLabel};
use crate::trips::{City, TripTable};

/// Result of one aggregator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome<T> {
    Ready { summary: T },
    NoData { error: StatsError },
}

/// One aggregator's outcome and how long it took.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section<T> {
    pub outcome: Outcome<T>,
    pub elapsed_secs: f64,
}

impl<T> Section<T> {
    fn new(result: Result<T, StatsError>, elapsed: Duration) -> Self {
        let outcome = match result {
            Ok(summary) => Outcome::Ready { summary },
            Err(error) => Outcome::NoData { error },
        };
        Section {
            outcome,
            elapsed_secs: elapsed.as_secs_f64(),
        }
    }

    pub fn summary(&self) -> Option<&T> {
        match &self.outcome {
            Outcome::Ready { summary } => Some(summary),
            Outcome::NoData { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&StatsError> {
        match &self.outcome {
            Outcome::Ready { .. } => None,
            Outcome::NoData { error } => Some(error),
        }
    }
}

/// Everything shown for one city + filter query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryReport {
    pub city: City,
    pub selection: SelectionLabel,
    pub rows: usize,
    pub travel_times: Section<TravelTimes>,
    pub stations: Section<StationPopularity>,
    pub durations: Section<DurationSummary>,
    pub demographics: Section<Demographics>,
}

fn timed<T>(name: &str, run: impl FnOnce() -> Result<T, StatsError>) -> Section<T> {
    let start = Instant::now();
    let result = run();
    let elapsed = start.elapsed();

    match &result {
        Ok(_) => debug!(
            aggregator = name,
            elapsed_secs = elapsed.as_secs_f64(),
            "Aggregator finished"
        ),
        Err(e) => warn!(aggregator = name, error = %e, "Aggregator skipped"),
    }

    Section::new(result, elapsed)
}

fn travel_times(table: &TripTable) -> Section<TravelTimes> {
    timed("time_of_travel", || time_of_travel::summarize(table))
}

fn station_popularity(table: &TripTable) -> Section<StationPopularity> {
    timed("stations", || stations::summarize(table))
}

fn durations(table: &TripTable) -> Section<DurationSummary> {
    timed("duration", || duration::summarize(table))
}

fn rider_demographics(table: &TripTable) -> Section<Demographics> {
    timed("demographics", || Ok(demographics::summarize(table)))
}

/// Runs the four aggregators one after another over an already filtered table.
#[tracing::instrument(skip(table, selection), fields(city = %table.city(), rows = table.len()))]
pub fn build_report(table: &TripTable, selection: &FilterSelection) -> QueryReport {
    QueryReport {
        city: table.city(),
        selection: selection.describe(),
        rows: table.len(),
        travel_times: travel_times(table),
        stations: station_popularity(table),
        durations: durations(table),
        demographics: rider_demographics(table),
    }
}

/// Same as [`build_report`] but runs each aggregator on its own blocking task.
///
/// The table is shared read-only, so the aggregators can finish in any order.
#[tracing::instrument(skip(table, selection), fields(city = %table.city(), rows = table.len()))]
pub async fn build_report_concurrent(
    table: Arc<TripTable>,
    selection: &FilterSelection,
) -> Result<QueryReport> {
    let (travel_times, stations, durations, demographics) = tokio::try_join!(
        tokio::task::spawn_blocking({
            let table = Arc::clone(&table);
            move || travel_times(&table)
        }),
        tokio::task::spawn_blocking({
            let table = Arc::clone(&table);
            move || station_popularity(&table)
        }),
        tokio::task::spawn_blocking({
            let table = Arc::clone(&table);
            move || durations(&table)
        }),
        tokio::task::spawn_blocking({
            let table = Arc::clone(&table);
            move || rider_demographics(&table)
        }),
    )?;

    Ok(QueryReport {
        city: table.city(),
        selection: selection.describe(),
        rows: table.len(),
        travel_times,
        stations,
        durations,
        demographics,
    })
}

/// Narrows `table` to `selection`. `table` itself is not modified and can
/// be queried again.
pub fn select(table: &TripTable, selection: &FilterSelection) -> TripTable {
    let filtered = filter::apply(table, selection);
    info!(
        city = %table.city(),
        total = table.len(),
        selected = filtered.len(),
        "Selection ready"
    );
    filtered
}

/// Filters `table` by `selection` and summarizes the result.
pub fn explore(table: &TripTable, selection: &FilterSelection) -> QueryReport {
    build_report(&select(table, selection), selection)
}

/// Same as [`explore`] with the aggregators running concurrently.
pub async fn explore_concurrent(
    table: &TripTable,
    selection: &FilterSelection,
) -> Result<QueryReport> {
    build_report_concurrent(Arc::new(select(table, selection)), selection).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trips::tests::{at, trip};
    use crate::trips::Schema;
    use chrono::{Month, Weekday};

    fn sample() -> TripTable {
        // 2017-01-02 Monday, 2017-02-07 Tuesday
        TripTable::new(
            City::Chicago,
            Schema::default(),
            vec![
                trip(at(2017, 1, 2, 8), 120.0, "A", "B"),
                trip(at(2017, 1, 2, 8), 180.0, "A", "B"),
                trip(at(2017, 2, 7, 17), 300.0, "B", "C"),
            ],
        )
    }

    #[test]
    fn test_explore_january() {
        let table = sample();
        let selection = FilterSelection::new(Some(Month::January), None);

        let report = explore(&table, &selection);

        assert_eq!(report.rows, 2);
        assert_eq!(report.selection.month, Some("January"));
        let durations = report.durations.summary().unwrap();
        assert_eq!(durations.total_duration_seconds, 300.0);
        assert_eq!(durations.mean_duration_seconds, 150.0);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_empty_selection_degrades_per_section() {
        let table = sample();
        let selection = FilterSelection::new(Some(Month::March), Some(Weekday::Sun));

        let report = explore(&table, &selection);

        assert_eq!(report.rows, 0);
        assert!(matches!(
            report.travel_times.error(),
            Some(StatsError::EmptyDataset { .. })
        ));
        assert!(report.stations.error().is_some());
        assert!(report.durations.error().is_some());
        let demographics = report.demographics.summary().unwrap();
        assert!(demographics.user_type_counts.is_empty());
    }

    #[test]
    fn test_report_serializes_status() {
        let table = TripTable::new(City::Washington, Schema::default(), vec![]);
        let report = build_report(&table, &FilterSelection::default());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["city"], "washington");
        assert_eq!(json["durations"]["outcome"]["status"], "no_data");
        assert_eq!(
            json["durations"]["outcome"]["error"]["kind"],
            "empty_dataset"
        );
        assert_eq!(json["demographics"]["outcome"]["status"], "ready");
    }

    #[tokio::test]
    async fn test_concurrent_matches_sequential() {
        let table = sample();
        let selection = FilterSelection::default();

        let sequential = build_report(&table, &selection);
        let concurrent = build_report_concurrent(Arc::new(table), &selection)
            .await
            .unwrap();

        assert_eq!(sequential.travel_times.outcome, concurrent.travel_times.outcome);
        assert_eq!(sequential.stations.outcome, concurrent.stations.outcome);
        assert_eq!(sequential.durations.outcome, concurrent.durations.outcome);
        assert_eq!(sequential.demographics.outcome, concurrent.demographics.outcome);
    }

    #[tokio::test]
    async fn test_explore_concurrent_filters_first() {
        let table = sample();
        let selection = FilterSelection::new(None, Some(Weekday::Tue));

        let report = explore_concurrent(&table, &selection).await.unwrap();

        assert_eq!(report.rows, 1);
        assert_eq!(report.selection.weekday, Some("Tuesday"));
        assert_eq!(report.durations.outcome, explore(&table, &selection).durations.outcome);
        assert_eq!(table.len(), 3);
    }
}
