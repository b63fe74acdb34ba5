//! Data types used by the aggregation pipeline.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::aggregate::utility::mean;
use crate::parser::PanelRow;

/// Accumulated observations for one panelist across all periods read so far.
///
/// A record is only ever created from a sighting, so `weights` is never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelistRecord {
    weights: Vec<f64>,
    features: String,
    last_period: usize,
}

impl PanelistRecord {
    pub(crate) fn new(period: usize, weight: f64, features: String) -> Self {
        Self {
            weights: vec![weight],
            features,
            last_period: period,
        }
    }

    /// Records a sighting in `period`. A repeat sighting within the same
    /// period replaces that period's values rather than adding a weight.
    pub(crate) fn observe(&mut self, period: usize, weight: f64, features: String) {
        if period == self.last_period {
            if let Some(last) = self.weights.last_mut() {
                *last = weight;
            }
        } else {
            self.weights.push(weight);
            self.last_period = period;
        }
        self.features = features;
    }

    /// One weight per period in which the panelist appeared, in read order.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Feature columns from the most recent period, joined by the delimiter.
    pub fn features(&self) -> &str {
        &self.features
    }

    pub fn mean_weight(&self) -> Option<f64> {
        mean(&self.weights)
    }
}

/// Header and decoded rows of a single period file.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodFile {
    pub header: Vec<String>,
    pub rows: Vec<PanelRow>,
}

/// Outcome of a completed run, logged as JSON once the output is written.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub panel: String,
    pub periods: usize,
    pub rows: usize,
    pub panelists: usize,
    pub output: String,
    pub generated_at: DateTime<Utc>,
}
