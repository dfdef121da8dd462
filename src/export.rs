//! Lossless export of the document to JSON.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::info;

use crate::error::{StorageError, StorageResult};
use crate::storage::Document;

/// File name of an export taken on `day`.
pub fn export_file_name(day: NaiveDate) -> String {
    format!("growth-map-journey-{}.json", day.format("%Y-%m-%d"))
}

/// Write `doc` as pretty-printed JSON to `writer`.
pub fn export_to_writer<W: Write>(doc: &Document, mut writer: W) -> StorageResult<()> {
    serde_json::to_writer_pretty(&mut writer, doc)?;
    writer
        .write_all(b"\n")
        .and_then(|_| writer.flush())
        .map_err(|e| StorageError::Io {
            path: "<writer>".to_string(),
            message: e.to_string(),
        })
}

/// Write `doc` into `dir` under the dated export file name. Returns the file path.
pub fn export_to_dir(doc: &Document, dir: &Path, day: NaiveDate) -> StorageResult<PathBuf> {
    let io_error = |e: std::io::Error| StorageError::Io {
        path: dir.display().to_string(),
        message: e.to_string(),
    };

    fs::create_dir_all(dir).map_err(io_error)?;
    let path = dir.join(export_file_name(day));
    let file = fs::File::create(&path).map_err(io_error)?;
    export_to_writer(doc, std::io::BufWriter::new(file))?;

    info!(
        path = %path.display(),
        entries = doc.entries.len(),
        "Growth map exported"
    );
    Ok(path)
}
