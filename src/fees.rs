//! Violation fee reference table.

use crate::error::SummaristError;

use csv::{ReaderBuilder, StringRecord};
use hashbrown::HashMap;
use std::path::Path;

const CODE_COLUMN: &str = "VIOLATION CODE";
// The embedded newlines and the double space after "Manhattan" are verbatim
// from the published reference file.
const MANHATTAN_COLUMN: &str = "Manhattan  96th St. & below\n(Fine Amount $)";
const OTHER_AREAS_COLUMN: &str = "All Other Areas\n(Fine Amount $)";

/// Fine amounts per violation code, loaded once at startup.
#[derive(Debug)]
pub struct FeeTable {
    fees: HashMap<String, (f64, f64)>,
}

impl FeeTable {
    pub fn load(path: &Path) -> Result<Self, SummaristError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .map_err(|source| SummaristError::csv(path, source))?;
        let headers = reader
            .headers()
            .map_err(|source| SummaristError::csv(path, source))?;
        let code = position(headers, CODE_COLUMN, path)?;
        let manhattan = position(headers, MANHATTAN_COLUMN, path)?;
        let other_areas = position(headers, OTHER_AREAS_COLUMN, path)?;

        let mut fees = HashMap::new();
        for record in reader.records() {
            let record = record.map_err(|source| SummaristError::csv(path, source))?;
            let key = record.get(code).unwrap_or_default().trim();
            if key.is_empty() {
                continue;
            }
            // Duplicate codes keep the last row.
            fees.insert(
                key.to_string(),
                (parse_fee(record.get(manhattan)), parse_fee(record.get(other_areas))),
            );
        }
        Ok(Self { fees })
    }

    /// Fine amounts for `code` as `(manhattan_96th_st_and_below,
    /// all_other_areas)`. Unknown codes carry zero fees.
    pub fn lookup(&self, code: &str) -> (f64, f64) {
        self.fees.get(code).copied().unwrap_or((0.0, 0.0))
    }

    pub fn len(&self) -> usize {
        self.fees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fees.is_empty()
    }
}

fn position(headers: &StringRecord, column: &str, path: &Path) -> Result<usize, SummaristError> {
    headers
        .iter()
        .position(|header| header == column)
        .ok_or_else(|| SummaristError::column_missing(column, path))
}

fn parse_fee(field: Option<&str>) -> f64 {
    field
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(0.0)
}
