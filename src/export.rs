//! CSV export of healthy endpoints.

use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::probe::ProbeResult;

/// Written in the model column of an endpoint without models.
pub const NO_MODELS: &str = "no models";

#[derive(Debug, Error)]
#[error("cannot write CSV export {path}: {source}")]
pub struct ExportError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Write `URL,Model` rows for `results` to `out`.
pub fn write_csv<W: Write>(mut out: W, results: &[ProbeResult]) -> io::Result<()> {
    writeln!(out, "URL,Model")?;
    for result in results {
        let models = if result.models.is_empty() {
            NO_MODELS.to_string()
        } else {
            result.models.join("; ")
        };
        writeln!(out, "{},{}", escape(&result.endpoint), escape(&models))?;
    }
    out.flush()
}

/// An export file opened before the run, so an unwritable path fails early.
#[derive(Debug)]
pub struct CsvSink {
    path: PathBuf,
    file: File,
}

impl CsvSink {
    /// Create (or truncate) the export file.
    pub fn create(path: &Path) -> Result<Self, ExportError> {
        let file = File::create(path).map_err(|source| ExportError {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write every result and close the file.
    pub fn write(self, results: &[ProbeResult]) -> Result<(), ExportError> {
        write_csv(BufWriter::new(self.file), results).map_err(|source| ExportError {
            path: self.path.clone(),
            source,
        })?;
        tracing::info!(path = %self.path.display(), rows = results.len(), "CSV export written");
        Ok(())
    }
}

fn escape(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}
