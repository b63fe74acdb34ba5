//! Discovery of the period files in an input directory.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{PanelError, PanelResult};

/// One period file to be read, in processing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodSource {
    pub name: OsString,
    pub path: PathBuf,
}

/// Lists the period files in `dir`, sorted by file name ascending.
///
/// Period chronology follows the names (e.g. date-prefixed files), so a
/// later name is treated as a later period. Hidden entries (leading `.`)
/// are skipped silently; sub-directories are skipped with a warning.
pub fn list_period_files(dir: &Path) -> PanelResult<Vec<PeriodSource>> {
    let read_err = |source: std::io::Error| PanelError::DirectoryRead {
        path: dir.to_path_buf(),
        source,
    };

    let mut sources = Vec::new();

    for entry in fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let name = entry.file_name();

        if is_hidden(&name) {
            debug!(name = %name.to_string_lossy(), "Skipping hidden entry");
            continue;
        }

        if entry.file_type().map_err(read_err)?.is_dir() {
            warn!(name = %name.to_string_lossy(), "Skipping sub-directory in period directory");
            continue;
        }

        sources.push(PeriodSource {
            path: entry.path(),
            name,
        });
    }

    sources.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(sources)
}

fn is_hidden(name: &OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}
