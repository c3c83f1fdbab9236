//! Dataset schemas and row normalisation.
//!
//! Partition files are headerless; columns are bound positionally by the
//! fixed expected header list for the dataset.

use csv::StringRecord;

/// Sentinel recorded by the upstream feed when no valid measurement exists.
pub const MISSING_SENTINEL: f64 = -999.0;

/// Fallback literal for categorical fields with no value.
pub const UNKNOWN_CATEGORY: &str = "unknown";

/// Column layout of one air quality partition file.
pub const AIR_QUALITY_HEADERS: [&str; 13] = [
    "Latitude",
    "Longitude",
    "Time",
    "Parameter",
    "Concentration",
    "Unit",
    "Raw-Concentration",
    "AQI",
    "Category",
    "Site-Name",
    "Site-Agency",
    "AQS-ID",
    "Full_AQS-ID",
];

// Positions bound by AIR_QUALITY_HEADERS.
const PARAMETER: usize = 3;
const AQI: usize = 7;
const SITE_NAME: usize = 9;
const SITE_AGENCY: usize = 10;

/// One normalised air quality row.
#[derive(Debug, PartialEq)]
pub struct Reading {
    /// Air quality index. None when the field is the missing sentinel, NaN or
    /// does not parse.
    pub aqi: Option<f64>,
    pub parameter: String,
    pub site_name: String,
    pub site_agency: String,
}

impl Reading {
    /// Normalise one raw row.
    ///
    /// Total function: malformed fields become missing values or the fallback
    /// literal, never an error. Arity has already been checked by the decoder.
    pub fn from_record(record: &StringRecord) -> Self {
        Reading {
            aqi: numeric_field(record, AQI),
            parameter: categorical_field(record, PARAMETER),
            site_name: categorical_field(record, SITE_NAME),
            site_agency: categorical_field(record, SITE_AGENCY),
        }
    }
}

fn numeric_field(record: &StringRecord, index: usize) -> Option<f64> {
    let value: f64 = record.get(index)?.trim().parse().ok()?;
    if value == MISSING_SENTINEL || value.is_nan() {
        None
    } else {
        Some(value)
    }
}

/// Absent and empty values normalise to the fallback literal. Present values
/// are preserved as-is, case and whitespace included.
fn categorical_field(record: &StringRecord, index: usize) -> String {
    match record.get(index) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => UNKNOWN_CATEGORY.to_string(),
    }
}

/// Columns projected from the parking violations export. The export carries
/// many more columns; these are resolved by name against its header row.
pub const VIOLATION_HEADERS: [&str; 7] = [
    "Summons Number",
    "Plate ID",
    "Registration State",
    "Issue Date",
    "Street Name",
    "Violation Code",
    "Violation Description",
];

/// One projected parking violation row.
#[derive(Debug, PartialEq)]
pub struct Violation {
    pub summons_number: String,
    pub plate_id: String,
    pub registration_state: String,
    pub issue_date: String,
    pub street_name: String,
    pub violation_code: String,
    pub violation_description: String,
}

impl Violation {
    /// Project one raw row given the positions of the expected columns within
    /// the file's header. Fields beyond the row's arity become empty strings.
    pub fn from_record(record: &StringRecord, positions: &[usize; 7]) -> Self {
        let field = |i: usize| record.get(positions[i]).unwrap_or_default().to_string();
        Violation {
            summons_number: field(0),
            plate_id: field(1),
            registration_state: field(2),
            issue_date: field(3),
            street_name: field(4),
            violation_code: field(5),
            violation_description: field(6),
        }
    }
}
