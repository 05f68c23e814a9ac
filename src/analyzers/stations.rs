use std::collections::BTreeMap;

use crate::analyzers::types::{Route, StationPopularity};
use crate::analyzers::utility::FrequencyTable;
use crate::error::StatsError;
use crate::trips::TripTable;

const AGGREGATOR: &str = "station popularity";

/// Route with the most trips.
///
/// Routes are visited in (start, end) key order and a later route replaces
/// the current pick when its count is greater than *or equal to* the best so
/// far, so the last route in key order wins a tie.
fn busiest_route(table: &TripTable) -> Option<(Route, usize)> {
    let mut groups: BTreeMap<(&str, &str), usize> = BTreeMap::new();
    for trip in table.iter() {
        *groups
            .entry((trip.start_station(), trip.end_station()))
            .or_default() += 1;
    }

    let mut best: Option<((&str, &str), usize)> = None;
    for (key, count) in groups {
        if best.is_none_or(|(_, highest)| count >= highest) {
            best = Some((key, count));
        }
    }

    best.map(|((start, end), count)| {
        (
            Route {
                start_station: start.to_string(),
                end_station: end.to_string(),
            },
            count,
        )
    })
}

/// Most common start station, end station and route.
///
/// # Errors
///
/// Returns [`StatsError::EmptyDataset`] if `table` has no rows.
pub fn summarize(table: &TripTable) -> Result<StationPopularity, StatsError> {
    let empty = || StatsError::EmptyDataset {
        aggregator: AGGREGATOR,
    };

    let starts: FrequencyTable<&str> = table.iter().map(|t| t.start_station()).collect();
    let ends: FrequencyTable<&str> = table.iter().map(|t| t.end_station()).collect();

    let start = starts.mode().ok_or_else(empty)?.value;
    let end = ends.mode().ok_or_else(empty)?.value;
    let (route, route_count) = busiest_route(table).ok_or_else(empty)?;

    Ok(StationPopularity {
        most_common_start_station: start.to_string(),
        most_common_end_station: end.to_string(),
        most_frequent_route: route,
        most_frequent_route_count: route_count,
    })
}
