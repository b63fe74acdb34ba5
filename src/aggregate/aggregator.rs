use std::fs::File;
use std::path::Path;

use chrono::Utc;
use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info, warn};

use crate::aggregate::table::AggregationTable;
use crate::aggregate::types::{PeriodFile, RunSummary};
use crate::config::AggregateConfig;
use crate::error::{PanelError, PanelResult};
use crate::output::write_output;
use crate::parser::parse_row;
use crate::sources::{PeriodSource, list_period_files};

/// Aggregates every period file in the configured directory into a single
/// output file.
///
/// The whole table is built before anything is written; any read, parse or
/// write failure aborts the run.
#[tracing::instrument(skip_all, fields(panel = %config.panel, files_dir = %config.files_dir.display()))]
pub fn aggregate_periods(config: &AggregateConfig) -> PanelResult<RunSummary> {
    let sources = list_period_files(&config.files_dir)?;
    if sources.is_empty() {
        warn!("No period files found, output will only hold an empty header");
    }

    let table = aggregate_sources(&sources, config.delimiter)?;
    write_output(&config.output, &table)?;

    Ok(RunSummary {
        panel: config.panel.clone(),
        periods: table.periods(),
        rows: table.rows(),
        panelists: table.len(),
        output: config.output.display().to_string(),
        generated_at: Utc::now(),
    })
}

/// Reads and merges `sources` in order, one open file at a time.
pub fn aggregate_sources(sources: &[PeriodSource], delimiter: u8) -> PanelResult<AggregationTable> {
    let mut table = AggregationTable::new(delimiter);

    for (period, source) in sources.iter().enumerate() {
        info!(file = %source.name.to_string_lossy(), period, "Working file");

        let PeriodFile { header, rows } = read_period(&source.path, delimiter)?;
        let merged = table.merge(header, rows);
        debug!(file = %source.name.to_string_lossy(), merged, "Period merged");
    }

    Ok(table)
}

/// Reads the header and all data rows of one period file.
///
/// Quotes have no special meaning: every field is carried through verbatim,
/// matching the unquoted output. The file handle is released before this
/// returns.
pub fn read_period(path: &Path, delimiter: u8) -> PanelResult<PeriodFile> {
    let file = File::open(path).map_err(|source| PanelError::FileOpen {
        path: path.to_path_buf(),
        source,
    })?;

    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(file);

    let mut header = StringRecord::new();
    let has_header = rdr
        .read_record(&mut header)
        .map_err(|source| PanelError::HeaderRead {
            path: path.to_path_buf(),
            source,
        })?;
    if !has_header {
        return Err(PanelError::EmptyPeriodFile {
            path: path.to_path_buf(),
        });
    }

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|source| PanelError::RowRead {
            path: path.to_path_buf(),
            source,
        })?;

        let row = parse_row(&record).map_err(|source| PanelError::InvalidRow {
            path: path.to_path_buf(),
            line: record.position().map_or(0, |p| p.line()),
            source,
        })?;
        rows.push(row);
    }

    Ok(PeriodFile {
        header: header.iter().map(str::to_string).collect(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RowError;
    use std::fs;

    #[test]
    fn test_read_period_header_and_ragged_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("day1.tsv");
        fs::write(&path, "id\twgt\tfeat\nA\t1,0\tx\textra\nB\t2\n").unwrap();

        let period = read_period(&path, b'\t').unwrap();

        assert_eq!(period.header, vec!["id", "wgt", "feat"]);
        assert_eq!(period.rows.len(), 2);
        assert_eq!(period.rows[0].weight, 1.0);
        assert_eq!(period.rows[0].features, vec!["x", "extra"]);
        assert!(period.rows[1].features.is_empty());
    }

    #[test]
    fn test_read_period_custom_delimiter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("day1.csv");
        fs::write(&path, "id;wgt;feat\nA;0,5;x\n").unwrap();

        let period = read_period(&path, b';').unwrap();

        assert_eq!(period.rows[0].key, "A");
        assert_eq!(period.rows[0].weight, 0.5);
    }

    #[test]
    fn test_read_period_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("day1.tsv");
        fs::write(&path, "").unwrap();

        let err = read_period(&path, b'\t').unwrap_err();

        assert!(matches!(err, PanelError::EmptyPeriodFile { .. }));
    }

    #[test]
    fn test_read_period_missing_file() {
        let dir = tempfile::tempdir().unwrap();

        let err = read_period(&dir.path().join("nope.tsv"), b'\t').unwrap_err();

        assert!(matches!(err, PanelError::FileOpen { .. }));
    }

    #[test]
    fn test_read_period_malformed_row_reports_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("day1.tsv");
        fs::write(&path, "id\twgt\nA\t1\nB\n").unwrap();

        let err = read_period(&path, b'\t').unwrap_err();

        match err {
            PanelError::InvalidRow { line, source, .. } => {
                assert_eq!(line, 3);
                assert!(matches!(source, RowError::MalformedRow { fields: 1 }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_read_period_bad_weight() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("day1.tsv");
        fs::write(&path, "id\twgt\nA\tn/a\n").unwrap();

        let err = read_period(&path, b'\t').unwrap_err();

        assert!(matches!(
            err,
            PanelError::InvalidRow {
                source: RowError::NumericParse { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_aggregate_sources_in_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.tsv"), "id\twgt\tfeat\nA\t3\tlate\n").unwrap();
        fs::write(dir.path().join("a.tsv"), "id\twgt\tfeat\nA\t1\tearly\n").unwrap();

        let sources = list_period_files(dir.path()).unwrap();
        let table = aggregate_sources(&sources, b'\t').unwrap();

        let record = table.get("A").unwrap();
        assert_eq!(record.weights(), &[1.0, 3.0]);
        assert_eq!(record.features(), "late");
        assert_eq!(table.periods(), 2);
    }

    #[test]
    fn test_read_period_unbalanced_quote_stays_in_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("day1.tsv");
        fs::write(&path, "id\twgt\tfeat\nA\t1\t\"5 inch\nB\t2\ty\nC\t3\tz\n").unwrap();

        let period = read_period(&path, b'\t').unwrap();

        let keys: Vec<_> = period.rows.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["A", "B", "C"]);
        assert_eq!(period.rows[0].features, vec!["\"5 inch"]);
    }

    #[test]
    fn test_aggregate_periods_empty_directory_writes_header_line() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.tsv");
        let input = dir.path().join("in");
        fs::create_dir(&input).unwrap();
        fs::write(input.join(".hidden"), "id\twgt\nA\t1\n").unwrap();
        let config = AggregateConfig::new("tv", &input, "\t", &output).unwrap();

        let summary = aggregate_periods(&config).unwrap();

        assert_eq!(summary.periods, 0);
        assert_eq!(summary.panelists, 0);
        assert_eq!(fs::read_to_string(&output).unwrap(), "\n");
    }
}
