//! CSV row decoding.

use crate::error::SummaristError;
use crate::schema::{Violation, VIOLATION_HEADERS};

use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::path::Path;

/// Decode one headerless partition file into raw rows.
///
/// Every row is checked against the expected column count before any row is
/// handed to the caller, so a malformed file never contributes partial state
/// to a summary.
pub fn read_rows(
    path: &Path,
    expected_columns: usize,
) -> Result<Vec<StringRecord>, SummaristError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|source| SummaristError::csv(path, source))?;
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| SummaristError::csv(path, source))?;
        if record.len() != expected_columns {
            return Err(SummaristError::SchemaMismatch {
                path: path.display().to_string(),
                expected: expected_columns,
                actual: record.len(),
            });
        }
        rows.push(record);
    }
    Ok(rows)
}

/// Streaming reader over the large violations export.
///
/// The export carries a header row naming many columns. The columns in
/// [VIOLATION_HEADERS] are resolved to positions once at open time, then data
/// rows are projected into [Violation]s in fixed-size chunks.
#[derive(Debug)]
pub struct ChunkedRows {
    reader: csv::Reader<File>,
    positions: [usize; VIOLATION_HEADERS.len()],
    chunk_size: usize,
    path: String,
}

impl ChunkedRows {
    pub fn open(path: &Path, chunk_size: usize) -> Result<Self, SummaristError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .map_err(|source| SummaristError::csv(path, source))?;
        let headers = reader.headers().map_err(|source| SummaristError::csv(path, source))?;
        let mut positions = [0; VIOLATION_HEADERS.len()];
        for (slot, column) in positions.iter_mut().zip(VIOLATION_HEADERS) {
            *slot = headers
                .iter()
                .position(|header| header == column)
                .ok_or_else(|| SummaristError::column_missing(column, path))?;
        }
        Ok(Self {
            reader,
            positions,
            chunk_size,
            path: path.display().to_string(),
        })
    }

    /// Read the next chunk of at most `chunk_size` rows, or `None` at end of
    /// file. A final short chunk is normal.
    pub fn next_chunk(&mut self) -> Result<Option<Vec<Violation>>, SummaristError> {
        let mut chunk = Vec::new();
        let mut record = StringRecord::new();
        while chunk.len() < self.chunk_size {
            let more = self
                .reader
                .read_record(&mut record)
                .map_err(|source| SummaristError::Csv {
                    path: self.path.clone(),
                    source,
                })?;
            if !more {
                break;
            }
            chunk.push(Violation::from_record(&record, &self.positions));
        }
        if chunk.is_empty() {
            Ok(None)
        } else {
            Ok(Some(chunk))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils;

    #[test]
    fn reads_headerless_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = test_utils::write_file(dir.path(), "rows.csv", "a,b,c\nd,e,f\n");

        let rows = read_rows(&path, 3).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0], &StringRecord::from(vec!["a", "b", "c"]));
    }

    #[test]
    fn quoted_fields_do_not_change_the_column_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = test_utils::write_file(
            dir.path(),
            "rows.csv",
            "a,\"b, with comma\",c\nd,\"e\nnewline\",f\n",
        );

        let rows = read_rows(&path, 3).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get(1), Some("b, with comma"));
        assert_eq!(rows[1].get(1), Some("e\nnewline"));
    }

    #[test]
    fn column_count_mismatch_fails_the_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = test_utils::write_file(dir.path(), "rows.csv", "a,b,c\nd,e\nf,g,h\n");

        let error = read_rows(&path, 3).unwrap_err();

        assert!(matches!(
            error,
            SummaristError::SchemaMismatch {
                expected: 3,
                actual: 2,
                ..
            }
        ));
        let message = error.to_string();
        assert!(message.contains("Expected 3 columns, found 2 columns."));
        assert!(message.contains("rows.csv"));
    }

    #[test]
    fn empty_file_yields_no_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = test_utils::write_file(dir.path(), "rows.csv", "");

        assert!(read_rows(&path, 3).unwrap().is_empty());
    }

    fn violations_csv() -> String {
        let mut contents = String::new();
        // Wider than the projected set, with the columns shuffled relative to
        // VIOLATION_HEADERS.
        contents.push_str(
            "Plate ID,Summons Number,Issue Date,Registration State,Vehicle Make,\
             Street Name,Violation Code,Violation Description\n",
        );
        for i in 0..5 {
            contents.push_str(&format!(
                "PLATE{i},10000{i},06/14/2019,NY,TOYOT,W 43rd St,21,Street Cleaning\n"
            ));
        }
        contents
    }

    #[test]
    fn chunked_rows_projects_expected_columns_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = test_utils::write_file(dir.path(), "violations.csv", &violations_csv());

        let mut rows = ChunkedRows::open(&path, 10).unwrap();
        let chunk = rows.next_chunk().unwrap().unwrap();

        assert_eq!(chunk.len(), 5);
        assert_eq!(chunk[0].summons_number, "100000");
        assert_eq!(chunk[0].plate_id, "PLATE0");
        assert_eq!(chunk[0].registration_state, "NY");
        assert_eq!(chunk[0].violation_code, "21");
        assert!(rows.next_chunk().unwrap().is_none());
    }

    #[test]
    fn chunks_are_fixed_size_with_a_short_tail() {
        let dir = tempfile::tempdir().unwrap();
        let path = test_utils::write_file(dir.path(), "violations.csv", &violations_csv());

        let mut rows = ChunkedRows::open(&path, 2).unwrap();

        assert_eq!(rows.next_chunk().unwrap().unwrap().len(), 2);
        assert_eq!(rows.next_chunk().unwrap().unwrap().len(), 2);
        assert_eq!(rows.next_chunk().unwrap().unwrap().len(), 1);
        assert!(rows.next_chunk().unwrap().is_none());
    }

    #[test]
    fn missing_expected_column_is_rejected_at_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = test_utils::write_file(
            dir.path(),
            "violations.csv",
            "Summons Number,Plate ID\n1,2\n",
        );

        let error = ChunkedRows::open(&path, 10).unwrap_err();

        assert!(matches!(
            error,
            SummaristError::ColumnMissing { ref column, .. } if column == "Registration State"
        ));
    }
}
