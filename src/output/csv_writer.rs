//! Writes outlooks to disk.
//!
//! Every file is first written to a temporary file in the destination
//! directory and then renamed over the target, so readers never observe a
//! half-written CSV. A failed write leaves any previous file untouched.

use crate::frames::daily_outlook::DailyOutlook;
use crate::output::error::WriteError;
use crate::types::rows::output_header;
use log::{debug, info};
use polars::prelude::*;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::{fs, task};

/// Directory that will hold `path`; `"."` for a bare file name.
fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

async fn ensure_parent(path: &Path) -> Result<PathBuf, WriteError> {
    let dir = parent_dir(path);
    fs::create_dir_all(&dir)
        .await
        .map_err(|e| WriteError::DirCreation(dir.clone(), e))?;
    Ok(dir)
}

/// Runs `fill` against a fresh temp file in `dir`, then moves it to `path`.
fn write_atomically<F>(dir: &Path, path: &Path, fill: F) -> Result<(), WriteError>
where
    F: FnOnce(&mut NamedTempFile) -> Result<(), WriteError>,
{
    let mut temp_file =
        NamedTempFile::new_in(dir).map_err(|e| WriteError::TempFile(path.to_path_buf(), e))?;
    fill(&mut temp_file)?;
    temp_file
        .flush()
        .map_err(|e| WriteError::Io(path.to_path_buf(), e))?;
    temp_file
        .persist(path)
        .map_err(|e| WriteError::Persist(path.to_path_buf(), e.error))?;
    Ok(())
}

/// Writes `outlook` as comma-separated text with a header row, replacing `path`.
///
/// Creates the parent directory when needed. Missing values become empty
/// fields; no index column is written.
pub async fn write_outlook(path: &Path, outlook: &DailyOutlook) -> Result<(), WriteError> {
    let dir = ensure_parent(path).await?;
    let path_buf = path.to_path_buf();
    let mut df = outlook.frame.clone();
    let rows = df.height();

    task::spawn_blocking(move || {
        write_atomically(&dir, &path_buf, |file| {
            CsvWriter::new(file)
                .include_header(true)
                .finish(&mut df)
                .map_err(|e| WriteError::Encode(path_buf.clone(), e))
        })
    })
    .await??;

    info!("Wrote {} rows to {:?}", rows, path);
    Ok(())
}

/// Writes a file holding only the header line, replacing `path`.
///
/// Used when no API key is configured, so downstream readers still find a
/// well-formed, empty table.
pub async fn write_placeholder(path: &Path) -> Result<(), WriteError> {
    let dir = ensure_parent(path).await?;
    let path_buf = path.to_path_buf();

    task::spawn_blocking(move || {
        write_atomically(&dir, &path_buf, |file| {
            writeln!(file, "{}", output_header()).map_err(|e| WriteError::Io(path_buf.clone(), e))
        })
    })
    .await??;

    debug!("Wrote header-only placeholder to {:?}", path);
    Ok(())
}
