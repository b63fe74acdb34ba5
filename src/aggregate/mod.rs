//! Panelist aggregation across period files.
//!
//! Period files are read one at a time in name order and merged into an
//! [`table::AggregationTable`], which keeps the mean-able weight history and
//! the most recent feature columns for every panelist.

pub mod aggregator;
pub mod table;
pub mod types;
pub mod utility;
