//! Data types and associated functions and methods

use crate::reducer::Summary;
use crate::schema::Violation;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::{Validate, ValidationError};

/// Outcome messages for the fires endpoints.
pub const BATCH_PROCESSED_MESSAGE: &str = "Processed files successfully.";
pub const BATCH_EMPTY_MESSAGE: &str = "No files found in the provided date range.";
pub const FILES_PROCESSED_MESSAGE: &str = "Files processed successfully.";
pub const FILES_EMPTY_MESSAGE: &str = "No files found for the provided date.";

/// Query parameters for a date range summary request
#[derive(Debug, Deserialize, PartialEq, Validate)]
#[serde(deny_unknown_fields)]
pub struct DateRangeQuery {
    /// First partition date included, as YYYYMMDD
    #[validate(custom = "validate_date_token")]
    pub start_date: String,
    /// Last partition date included, as YYYYMMDD
    #[validate(custom = "validate_date_token")]
    pub end_date: String,
}

/// Query parameters for a single date inspection request
#[derive(Debug, Deserialize, PartialEq, Validate)]
#[serde(deny_unknown_fields)]
pub struct DateQuery {
    /// Partition date, as YYYYMMDD
    #[validate(custom = "validate_date_token")]
    pub date: String,
}

/// Query parameters for a plate search request
#[derive(Debug, Deserialize, PartialEq, Validate)]
#[serde(deny_unknown_fields)]
pub struct PlateQuery {
    /// Exact plate to match
    #[validate(length(min = 1, message = "plate_number parameter is required"))]
    pub plate_number: String,
}

/// Validate a YYYYMMDD date token
fn validate_date_token(date: &str) -> Result<(), ValidationError> {
    if date.len() != 8 || !date.chars().all(|c| c.is_ascii_digit()) {
        let mut error = ValidationError::new("date parameters must be 8 digit YYYYMMDD tokens");
        error.add_param("value".into(), &date);
        return Err(error);
    }
    Ok(())
}

/// Response view of one reduced partition.
///
/// Frequency tables are keyed deterministically so identical data always
/// serialises identically.
#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub struct PartitionSummary {
    /// Seconds spent reducing the partition
    pub time_taken: f64,
    /// Mean AQI over rows with a valid value
    pub average_aqi: f64,
    pub site_name_frequency: BTreeMap<String, u64>,
    pub site_agency_frequency: BTreeMap<String, u64>,
    pub parameter_frequency: BTreeMap<String, u64>,
}

impl PartitionSummary {
    /// Return a PartitionSummary object.
    pub fn new(time_taken: f64, summary: Summary) -> Self {
        Self {
            time_taken,
            average_aqi: summary.mean(),
            site_name_frequency: sorted(summary.site_name),
            site_agency_frequency: sorted(summary.site_agency),
            parameter_frequency: sorted(summary.parameter),
        }
    }
}

fn sorted(table: hashbrown::HashMap<String, u64>) -> BTreeMap<String, u64> {
    table.into_iter().collect()
}

/// Response to a date range summary request
#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub struct BatchSummaryResponse {
    /// Outcome message
    pub message: String,
    /// Per-partition summaries, keyed by partition folder name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summaries: Option<BTreeMap<String, PartitionSummary>>,
}

/// Response to a single date inspection request
#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub struct FilesResponse {
    /// Outcome message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_count: Option<usize>,
}

/// A plate search hit enriched with fine amounts
#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub struct MatchRecord {
    pub summons_number: String,
    pub plate_id: String,
    pub registration_state: String,
    pub issue_date: String,
    pub street_name: String,
    pub violation_code: String,
    pub violation_description: String,
    /// Fine amount in Manhattan at or below 96th St.
    pub manhattan_fee: f64,
    /// Fine amount everywhere else
    pub other_areas_fee: f64,
}

impl MatchRecord {
    /// Return a MatchRecord object.
    pub fn new(violation: Violation, fees: (f64, f64)) -> Self {
        Self {
            summons_number: violation.summons_number,
            plate_id: violation.plate_id,
            registration_state: violation.registration_state,
            issue_date: violation.issue_date,
            street_name: violation.street_name,
            violation_code: violation.violation_code,
            violation_description: violation.violation_description,
            manhattan_fee: fees.0,
            other_areas_fee: fees.1,
        }
    }
}

/// Point census lookup result. Echoes the requested country and year;
/// `population` is None when the census holds no figure for the cell.
#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub struct PopulationResult {
    pub country: String,
    pub year: String,
    pub population: Option<u64>,
}

/// Census lookup result with the observed processing time in seconds
#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub struct PopulationResponse<T> {
    pub result: T,
    pub processing_time: f64,
}

impl<T> PopulationResponse<T> {
    /// Return a PopulationResponse object.
    pub fn new(result: T, processing_time: f64) -> Self {
        Self {
            result,
            processing_time,
        }
    }
}
