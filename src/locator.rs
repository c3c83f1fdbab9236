//! Partition discovery.
//!
//! Partitions are date-stamped folders under the data directory, each holding
//! one or more CSV files whose names embed a fixed-width `YYYYMMDD` token
//! before the first `.`. Tokens are zero-padded, so lexicographic comparison
//! is equivalent to chronological comparison.

use crate::error::SummaristError;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Return the `.csv` files per partition whose file-name date token falls
/// within `[start_date, end_date]`, inclusive on both sides.
///
/// Partitions with no qualifying file are omitted entirely. An empty map is a
/// successful result, not an error. File order within a partition follows
/// directory iteration order and is not sorted.
pub fn locate_range(
    data_dir: &Path,
    start_date: &str,
    end_date: &str,
) -> Result<BTreeMap<String, Vec<PathBuf>>, SummaristError> {
    let mut partitions = BTreeMap::new();
    for entry in read_dir(data_dir)? {
        let entry = dir_entry(entry, data_dir)?;
        let folder = entry.path();
        if !folder.is_dir() {
            continue;
        }
        let mut files = Vec::new();
        for file in read_dir(&folder)? {
            let file = dir_entry(file, &folder)?;
            let path = file.path();
            if !is_csv(&path) {
                continue;
            }
            if let Some(token) = date_token(&path) {
                if start_date <= token && token <= end_date {
                    files.push(path);
                }
            }
        }
        if !files.is_empty() {
            let name = entry.file_name().to_string_lossy().into_owned();
            partitions.insert(name, files);
        }
    }
    Ok(partitions)
}

/// Return all `.csv` files in the single folder named exactly `date`.
///
/// A `date` that is not purely numeric, or a folder that does not exist,
/// yields an empty set.
pub fn locate_exact(data_dir: &Path, date: &str) -> Result<Vec<PathBuf>, SummaristError> {
    if date.is_empty() || !date.chars().all(|c| c.is_ascii_digit()) {
        return Ok(Vec::new());
    }
    let folder = data_dir.join(date);
    if !folder.is_dir() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for file in read_dir(&folder)? {
        let file = dir_entry(file, &folder)?;
        let path = file.path();
        if is_csv(&path) {
            files.push(path);
        }
    }
    Ok(files)
}

fn read_dir(path: &Path) -> Result<fs::ReadDir, SummaristError> {
    fs::read_dir(path).map_err(|source| SummaristError::file_read(path, source))
}

fn dir_entry(
    entry: std::io::Result<fs::DirEntry>,
    dir: &Path,
) -> Result<fs::DirEntry, SummaristError> {
    entry.map_err(|source| SummaristError::file_read(dir, source))
}

fn is_csv(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == "csv")
}

/// The date token is the file name up to the first `.`.
fn date_token(path: &Path) -> Option<&str> {
    path.file_name()?.to_str()?.split('.').next()
}
