//! CSV export of the page on screen.

use crate::crm::Column;
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use log::*;
use std::{
    fs,
    io,
    path::{Path, PathBuf},
};

/// Return the export file name for a screen and page.
///
pub fn file_name(slug: &str, page: usize, at: NaiveDateTime) -> String {
    format!("{}-page{}-{}.csv", slug, page, at.format("%Y%m%d-%H%M%S"))
}

/// Write a header row of column titles followed by the rows.
///
pub fn write_rows<W: io::Write>(writer: W, columns: &[Column], rows: &[Vec<String>]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(columns.iter().map(|column| column.title))?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the rows to a new file in `dir`, creating the directory if
/// needed. Returns the file path.
///
pub fn export_page(
    dir: &Path,
    slug: &str,
    page: usize,
    columns: &[Column],
    rows: &[Vec<String>],
    at: NaiveDateTime,
) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory {}", dir.display()))?;
    let path = dir.join(file_name(slug, page, at));
    let file = fs::File::create(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    write_rows(file, columns, rows)?;
    info!("Exported {} rows to {}.", rows.len(), path.display());
    Ok(path)
}
