use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::transmittal::config::{TableLayout, TransmittalConfig};
use crate::transmittal::table::TransmittalTable;
use crate::types::identifiers::TableVersion;

const INVALID_FILE_CHARS: [char; 10] = ['/', '?', '<', '>', '\\', ':', '*', '|', '"', '^'];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Target directory does not exist: {0}")]
    MissingDirectory(PathBuf),
    #[error("Target exists and cannot be written: {0}")]
    Locked(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// The grid is already in place at `grid`; only its receipt is missing.
    #[error("Table written to {grid} but its receipt was not: {source}")]
    ReceiptNotPersisted {
        grid: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What a sink reports after persisting a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportReceipt {
    pub path: PathBuf,
    pub table_version: TableVersion,
    pub rows: usize,
    pub columns: usize,
    pub layout: TableLayout,
    pub written_at: DateTime<Utc>, // informational only
}

/// Destination for a finished table.
pub trait TableSink {
    /// Whether the target can be written right now. Called immediately
    /// before [`TableSink::write`]; nothing is held between the two.
    fn check_access(&self) -> Result<(), ExportError>;

    fn write(
        &mut self,
        table: &TransmittalTable,
        layout: &TableLayout,
    ) -> Result<ExportReceipt, ExportError>;
}

/// Hand `table` to `sink`.
///
/// The table is only borrowed, so on any error the caller still owns it and
/// can retry against the same or another sink without rebuilding.
pub fn export_table<S>(
    sink: &mut S,
    table: &TransmittalTable,
    config: &TransmittalConfig,
) -> Result<ExportReceipt, ExportError>
where
    S: TableSink + ?Sized,
{
    sink.check_access()?;
    let layout = table.column_layout(config);
    let receipt = sink.write(table, &layout)?;

    tracing::debug!(
        target: "keyed_core::export",
        path = %receipt.path.display(),
        version = receipt.table_version.as_str(),
        "exported transmittal table"
    );
    Ok(receipt)
}

/// Remove characters that are not allowed in file names, or swap them for
/// `replace` when given.
pub fn sanitize_file_name(name: &str, replace: Option<char>) -> String {
    name.chars()
        .filter_map(|c| {
            if INVALID_FILE_CHARS.contains(&c) {
                replace
            } else {
                Some(c)
            }
        })
        .collect()
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}

fn ensure_writable(path: &Path) -> Result<(), ExportError> {
    if path.exists() {
        let writable = !path.is_dir() && OpenOptions::new().write(true).open(path).is_ok();
        if !writable {
            tracing::warn!(
                target: "keyed_core::export",
                path = %path.display(),
                "export target exists but cannot be opened for writing"
            );
            return Err(ExportError::Locked(path.to_path_buf()));
        }
    }
    Ok(())
}

/// Writes a table as delimited text, tab separated unless configured
/// otherwise. Column layout cannot be expressed in the file and is only
/// recorded in the receipt.
#[derive(Debug, Clone)]
pub struct DelimitedFileSink {
    path: PathBuf,
    delimiter: u8,
    write_receipt: bool,
}

impl DelimitedFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            delimiter: b'\t',
            write_receipt: false,
        }
    }

    /// Target `file_name` inside `dir`, with invalid characters stripped.
    pub fn in_directory(dir: &Path, file_name: &str) -> Self {
        Self::new(dir.join(sanitize_file_name(file_name, None)))
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Also write `<stem>.receipt.json` next to the target.
    pub fn with_receipt(mut self, enabled: bool) -> Self {
        self.write_receipt = enabled;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn receipt_path(&self) -> PathBuf {
        self.path.with_extension("receipt.json")
    }

    fn write_receipt_file(receipt: &ExportReceipt, temp: &Path) -> Result<(), ExportError> {
        let f = File::create(temp)?;
        serde_json::to_writer_pretty(&f, receipt)?;
        f.sync_all()?;
        Ok(())
    }

    fn write_grid(&self, table: &TransmittalTable, temp: &Path) -> Result<(), ExportError> {
        let file = File::create(temp)?;
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(file);

        writer.write_record(table.header())?;
        for row in table.rows() {
            writer.write_record(row)?;
        }
        writer.flush()?;

        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
        Ok(())
    }
}

impl TableSink for DelimitedFileSink {
    fn check_access(&self) -> Result<(), ExportError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                return Err(ExportError::MissingDirectory(parent.to_path_buf()));
            }
        }

        ensure_writable(&self.path)?;
        if self.write_receipt {
            ensure_writable(&self.receipt_path())?;
        }

        Ok(())
    }

    /// The receipt is staged next to the grid before either is renamed into
    /// place, so a failed receipt write leaves the previous target untouched.
    fn write(
        &mut self,
        table: &TransmittalTable,
        layout: &TableLayout,
    ) -> Result<ExportReceipt, ExportError> {
        let receipt = ExportReceipt {
            path: self.path.clone(),
            table_version: table.version(),
            rows: table.rows().len(),
            columns: table.column_count(),
            layout: layout.clone(),
            written_at: Utc::now(),
        };

        // 1. Write grid and receipt to sibling temp files
        let grid_temp = temp_path(&self.path);
        let receipt_temp = self.write_receipt.then(|| temp_path(&self.receipt_path()));
        let discard = || {
            let _ = fs::remove_file(&grid_temp);
            if let Some(temp) = &receipt_temp {
                let _ = fs::remove_file(temp);
            }
        };

        let staged = self.write_grid(table, &grid_temp).and_then(|()| match &receipt_temp {
            Some(temp) => Self::write_receipt_file(&receipt, temp),
            None => Ok(()),
        });
        if let Err(err) = staged {
            discard();
            return Err(err);
        }

        // 2. Atomic rename over the target
        if let Err(err) = fs::rename(&grid_temp, &self.path) {
            discard();
            return Err(err.into());
        }

        // 3. Receipt follows; the grid is already persisted
        if let Some(temp) = &receipt_temp {
            if let Err(source) = fs::rename(temp, self.receipt_path()) {
                let _ = fs::remove_file(temp);
                tracing::warn!(
                    target: "keyed_core::export",
                    path = %self.path.display(),
                    error = %source,
                    "table exported without its receipt"
                );
                return Err(ExportError::ReceiptNotPersisted {
                    grid: self.path.clone(),
                    source,
                });
            }
        }

        Ok(receipt)
    }
}
