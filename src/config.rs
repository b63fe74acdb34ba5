use std::path::PathBuf;

use crate::error::{PanelError, PanelResult};

/// Settings for one aggregation run, resolved from the command line.
#[derive(Debug, Clone)]
pub struct AggregateConfig {
    /// Panel type label. Only used to tag logs and the run summary.
    pub panel: String,
    pub files_dir: PathBuf,
    /// Field separator for both the period files and the output.
    pub delimiter: u8,
    pub output: PathBuf,
}

impl AggregateConfig {
    pub fn new(
        panel: impl Into<String>,
        files_dir: impl Into<PathBuf>,
        sep: &str,
        output: impl Into<PathBuf>,
    ) -> PanelResult<Self> {
        Ok(Self {
            panel: panel.into(),
            files_dir: files_dir.into(),
            delimiter: parse_delimiter(sep)?,
            output: output.into(),
        })
    }
}

/// Parses a field separator argument into the byte the CSV reader expects.
///
/// Accepts a single ASCII character, the two-character escape `\t` (what a
/// shell passes for `--sep '\t'`) or the word `tab`.
pub fn parse_delimiter(sep: &str) -> PanelResult<u8> {
    if matches!(sep, "\\t" | "tab") {
        return Ok(b'\t');
    }

    let mut chars = sep.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() && !matches!(c, '"' | '\n' | '\r') => Ok(c as u8),
        _ => Err(PanelError::InvalidDelimiter(sep.to_string())),
    }
}
