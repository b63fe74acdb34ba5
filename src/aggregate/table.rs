use std::collections::HashMap;
use std::collections::hash_map::Entry;

use tracing::debug;

use crate::aggregate::types::PanelistRecord;
use crate::parser::PanelRow;

/// Panelist observations merged across an ordered sequence of period files.
///
/// Iteration order is that of the underlying `HashMap` and carries no meaning.
#[derive(Debug)]
pub struct AggregationTable {
    delimiter: u8,
    separator: String,
    header: Option<Vec<String>>,
    panelists: HashMap<String, PanelistRecord>,
    periods: usize,
    rows: usize,
}

impl AggregationTable {
    pub fn new(delimiter: u8) -> Self {
        Self {
            delimiter,
            separator: char::from(delimiter).to_string(),
            header: None,
            panelists: HashMap::new(),
            periods: 0,
            rows: 0,
        }
    }

    /// Merges the rows of one period file.
    ///
    /// Each call is a new period. The first header seen becomes
    /// the table header; later headers are discarded without comparison.
    /// Each row appends its weight to the panelist's record (a key repeated
    /// within one period replaces that period's weight) and replaces the
    /// stored features with this row's feature columns.
    pub fn merge<I>(&mut self, header: Vec<String>, rows: I) -> usize
    where
        I: IntoIterator<Item = PanelRow>,
    {
        if self.header.is_none() {
            self.header = Some(header);
        }

        let period = self.periods;
        let mut merged = 0;
        for row in rows {
            let features = row.features.join(&self.separator);

            match self.panelists.entry(row.key) {
                Entry::Occupied(mut entry) => entry.get_mut().observe(period, row.weight, features),
                Entry::Vacant(entry) => {
                    entry.insert(PanelistRecord::new(period, row.weight, features));
                }
            }
            merged += 1;
        }

        self.periods += 1;
        self.rows += merged;
        debug!(period, merged, panelists = self.panelists.len(), "Merged period");

        merged
    }

    pub fn header(&self) -> Option<&[String]> {
        self.header.as_deref()
    }

    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    pub fn get(&self, key: &str) -> Option<&PanelistRecord> {
        self.panelists.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PanelistRecord)> {
        self.panelists.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of distinct panelists.
    pub fn len(&self) -> usize {
        self.panelists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panelists.is_empty()
    }

    /// Number of period files merged.
    pub fn periods(&self) -> usize {
        self.periods
    }

    /// Total data rows merged across all periods.
    pub fn rows(&self) -> usize {
        self.rows
    }
}
