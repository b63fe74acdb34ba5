//! Serialization of the aggregated table.
//!
//! The output uses the same delimiter as the input: one header row followed
//! by one row per panelist holding the key, the mean weight to 5 decimal
//! places and the stored feature columns.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use csv::{QuoteStyle, WriterBuilder};
use tracing::{debug, info};

use crate::aggregate::table::AggregationTable;
use crate::error::{PanelError, PanelResult};

/// Formats a mean weight with exactly 5 decimal digits.
pub fn format_weight(weight: f64) -> String {
    format!("{weight:.5}")
}

/// Writes `table` to `writer` and flushes it.
///
/// Fields are written verbatim without quoting; the features payload is
/// already joined with the delimiter and is emitted as-is.
pub fn write_table<W: Write>(mut writer: W, table: &AggregationTable) -> io::Result<()> {
    if table.header().is_none() {
        // Nothing was merged; the header line is left empty.
        writer.write_all(b"\n")?;
    }

    let mut wtr = WriterBuilder::new()
        .delimiter(table.delimiter())
        .quote_style(QuoteStyle::Never)
        .flexible(true)
        .from_writer(writer);

    if let Some(header) = table.header() {
        wtr.write_record(header)?;
    }

    for (key, record) in table.iter() {
        let mean = record.mean_weight().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("panelist '{key}' has no recorded weights"),
            )
        })?;
        let weight = format_weight(mean);
        wtr.write_record([key, weight.as_str(), record.features()])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Creates the output file at `path` and writes `table` into it.
pub fn write_output(path: &Path, table: &AggregationTable) -> PanelResult<()> {
    debug!(path = %path.display(), panelists = table.len(), "Writing aggregated output");

    let file = File::create(path).map_err(|source| PanelError::OutputCreate {
        path: path.to_path_buf(),
        source,
    })?;

    write_table(file, table).map_err(|source| PanelError::OutputWrite {
        path: path.to_path_buf(),
        source,
    })?;

    info!(path = %path.display(), panelists = table.len(), "Output written");
    Ok(())
}
