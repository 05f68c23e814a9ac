//! Output formatting for query reports and raw trip rows.
//!
//! Supports a plain-text report, JSON serialization and CSV paging of the
//! rows behind a selection.

use anyhow::Result;
use csv::WriterBuilder;
use std::fmt::Write as _;
use std::io;
use tracing::debug;

use crate::analyzers::report::{QueryReport, Section};
use crate::analyzers::types::{Hms, SchemaField};
use crate::analyzers::utility::ValueCount;
use crate::trips::{TripTable, weekday_name};

/// Rows shown per raw-data page.
pub const PAGE_SIZE: usize = 5;

const RULE: &str = "----------------------------------------";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn hms(d: &Hms) -> String {
    format!(
        "{} Hours, {} Minutes and {} Seconds",
        d.hours, d.minutes, d.seconds
    )
}

fn counts(out: &mut String, counts: &[ValueCount<String>]) {
    for c in counts {
        let _ = writeln!(out, "{}: {}", c.value, c.count);
    }
}

fn section<T>(out: &mut String, title: &str, s: &Section<T>, body: impl FnOnce(&mut String, &T)) {
    let _ = writeln!(out, "\n{title}\n");
    match s.summary() {
        Some(summary) => body(out, summary),
        None => {
            let _ = writeln!(out, "No data for this selection.");
        }
    }
    let _ = writeln!(out, "\nThis took {:.6} seconds to compute", s.elapsed_secs);
    let _ = writeln!(out, "{RULE}");
}

/// Renders a report as the human-readable text shown after each query.
pub fn render_report(report: &QueryReport) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "City: {} | Month: {} | Day: {} | Trips: {}",
        report.city,
        report.selection.month.unwrap_or("all"),
        report.selection.weekday.unwrap_or("all"),
        report.rows
    );
    let _ = writeln!(out, "{RULE}");

    section(
        &mut out,
        "Calculating The Most Frequent Times of Travel...",
        &report.travel_times,
        |out, t| {
            let _ = writeln!(
                out,
                "The most common month for travel was: {}",
                t.most_common_month.name()
            );
            let _ = writeln!(
                out,
                "The most common day for travel was: {}",
                weekday_name(t.most_common_weekday)
            );
            let _ = writeln!(
                out,
                "The most common hour for travel was: {}",
                t.most_common_hour_local
            );
        },
    );

    section(
        &mut out,
        "Calculating The Most Popular Stations and Trip...",
        &report.stations,
        |out, s| {
            let _ = writeln!(
                out,
                "The most common start station was: {}",
                s.most_common_start_station
            );
            let _ = writeln!(
                out,
                "The most common end station was: {}\n",
                s.most_common_end_station
            );
            let _ = writeln!(
                out,
                "The most frequent combination of start station and end station trip was"
            );
            let _ = writeln!(out, "Start Station: {}", s.most_frequent_route.start_station);
            let _ = writeln!(out, "End Station: {}", s.most_frequent_route.end_station);
            let _ = writeln!(out, "With a total of {} trips", s.most_frequent_route_count);
        },
    );

    section(
        &mut out,
        "Calculating Trip Duration...",
        &report.durations,
        |out, d| {
            let _ = writeln!(out, "The total travel time was {}", hms(&d.total));
            let _ = writeln!(out, "The mean travel time was {}", hms(&d.mean));
        },
    );

    section(
        &mut out,
        "Calculating User Stats...",
        &report.demographics,
        |out, d| {
            counts(out, &d.user_type_counts);
            let _ = writeln!(out);

            match &d.gender_counts {
                SchemaField::Present(genders) => {
                    counts(out, genders);
                    let _ = writeln!(out);
                }
                SchemaField::Absent => {
                    let _ = writeln!(out, "Gender data is not available for {}", report.city);
                }
            }

            match &d.birth_year_stats {
                SchemaField::Present(Some(years)) => {
                    let _ = writeln!(
                        out,
                        "Our oldest customer was born in: {}",
                        years.earliest_birth_year
                    );
                    let _ = writeln!(
                        out,
                        "Our youngest customer was born in: {}",
                        years.most_recent_birth_year
                    );
                    let _ = writeln!(
                        out,
                        "The most common birth year of our customers is: {}",
                        years.most_common_birth_year
                    );
                }
                SchemaField::Present(None) => {
                    let _ = writeln!(out, "No birth year recorded for this selection");
                }
                SchemaField::Absent => {
                    let _ = writeln!(out, "Birth year data is not available for {}", report.city);
                }
            }
        },
    );

    out
}

/// Serializes a report as pretty-printed JSON.
pub fn render_json(report: &QueryReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Number of raw-data pages for `table` with `size` rows per page.
pub fn page_count(table: &TripTable, size: usize) -> usize {
    if size == 0 {
        0
    } else {
        table.len().div_ceil(size)
    }
}

/// Rows of page `page` (0-based). The last page may be short; pages past
/// the end are empty.
pub fn page(table: &TripTable, page: usize, size: usize) -> TripTable {
    let start = page.saturating_mul(size);
    table.slice_view(start, start.saturating_add(size))
}

/// Writes `table` as CSV with a header row, using the city file's column
/// names. Optional columns are written only when the city has them.
pub fn write_rows<W: io::Write>(table: &TripTable, writer: W) -> Result<()> {
    let schema = table.schema();
    let mut wtr = WriterBuilder::new().from_writer(writer);

    let mut header = vec!["Start Time"];
    if schema.has_end_time {
        header.push("End Time");
    }
    header.extend(["Trip Duration", "Start Station", "End Station", "User Type"]);
    if schema.has_gender {
        header.push("Gender");
    }
    if schema.has_birth_year {
        header.push("Birth Year");
    }
    wtr.write_record(&header)?;

    for trip in table.iter() {
        let mut row = vec![trip.start_time().format(TIMESTAMP_FORMAT).to_string()];
        if schema.has_end_time {
            row.push(
                trip.end_time()
                    .map(|t| t.format(TIMESTAMP_FORMAT).to_string())
                    .unwrap_or_default(),
            );
        }
        row.push(trip.trip_duration().to_string());
        row.push(trip.start_station().to_string());
        row.push(trip.end_station().to_string());
        row.push(trip.user_type().unwrap_or_default().to_string());
        if schema.has_gender {
            row.push(trip.gender().unwrap_or_default().to_string());
        }
        if schema.has_birth_year {
            row.push(trip.birth_year().map(|y| y.to_string()).unwrap_or_default());
        }
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    debug!(rows = table.len(), "Raw rows written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::report::build_report;
    use crate::filter::FilterSelection;
    use crate::parser::parse_trips;
    use crate::trips::City;

    const DATA: &str = "\
Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
2017-01-02 00:10:00,2017-01-02 00:12:00,120,A,B,Subscriber,Male,1990.0
2017-01-02 00:20:00,2017-01-02 00:23:00,180,A,B,Customer,,
2017-02-07 09:00:00,2017-02-07 09:05:00,300,B,C,Subscriber,Female,1985.0
";

    const NO_DEMOGRAPHICS: &str = "\
Start Time,Trip Duration,Start Station,End Station,User Type
2017-01-02 08:00:00,60,A,B,Subscriber
";

    fn sample() -> TripTable {
        parse_trips(City::Chicago, DATA.as_bytes()).unwrap()
    }

    #[test]
    fn test_render_report_contents() {
        let table = sample();
        let text = render_report(&build_report(&table, &FilterSelection::default()));

        assert!(text.contains("The most common month for travel was: January"));
        assert!(text.contains("The most common day for travel was: Monday"));
        assert!(text.contains("The most common hour for travel was: 12AM"));
        assert!(text.contains("Start Station: A"));
        assert!(text.contains("With a total of 2 trips"));
        assert!(text.contains("The total travel time was 0 Hours, 10 Minutes and 0 Seconds"));
        assert!(text.contains("Subscriber: 2"));
        assert!(text.contains("Our oldest customer was born in: 1985"));
    }

    #[test]
    fn test_render_report_missing_columns() {
        let table = parse_trips(City::Washington, NO_DEMOGRAPHICS.as_bytes()).unwrap();
        let text = render_report(&build_report(&table, &FilterSelection::default()));

        assert!(text.contains("Gender data is not available for washington"));
        assert!(text.contains("Birth year data is not available for washington"));
    }

    #[test]
    fn test_render_report_empty_selection() {
        let table = parse_trips(City::Washington, NO_DEMOGRAPHICS.as_bytes()).unwrap();
        let empty = page(&table, 10, PAGE_SIZE);
        let text = render_report(&build_report(&empty, &FilterSelection::default()));

        assert_eq!(text.matches("No data for this selection").count(), 3);
    }

    #[test]
    fn test_render_json_does_not_panic() {
        let table = sample();
        let json = render_json(&build_report(&table, &FilterSelection::default())).unwrap();
        assert!(json.contains("\"most_common_month\": \"January\""));
    }

    #[test]
    fn test_paging() {
        let table = sample();

        assert_eq!(page_count(&table, 2), 2);
        assert_eq!(page(&table, 0, 2).len(), 2);
        assert_eq!(page(&table, 1, 2).len(), 1);
        assert!(page(&table, 2, 2).is_empty());
        assert_eq!(page(&table, 1, 2).get(0).unwrap().trip_duration(), 300.0);
    }

    #[test]
    fn test_write_rows_round_trips_columns() {
        let table = sample();
        let mut buf = Vec::new();
        write_rows(&table, &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year"
        );
        assert_eq!(
            lines[1],
            "2017-01-02 00:10:00,2017-01-02 00:12:00,120,A,B,Subscriber,Male,1990"
        );

        let reparsed = parse_trips(City::Chicago, text.as_bytes()).unwrap();
        assert_eq!(reparsed.len(), table.len());
        assert_eq!(reparsed.get(1).unwrap().gender(), None);
    }

    #[test]
    fn test_write_rows_without_optional_columns() {
        let table = parse_trips(City::Washington, NO_DEMOGRAPHICS.as_bytes()).unwrap();
        let mut buf = Vec::new();
        write_rows(&table, &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("Start Time,Trip Duration,Start Station,End Station,User Type\n"));
    }
}
