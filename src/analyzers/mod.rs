//! Descriptive statistics over a (filtered) trip table.
//!
//! Four independent aggregators read the same table: busiest travel times,
//! station and route popularity, trip durations and rider demographics.
//! [`report`] runs them and collects their outcomes, degrading an
//! aggregator that has no rows to work with instead of failing the query.

pub mod demographics;
pub mod duration;
pub mod report;
pub mod stations;
pub mod time_of_travel;
pub mod types;
pub mod utility;
