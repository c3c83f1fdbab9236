//! Census population reference table.
//!
//! The census export is a wide CSV: country metadata columns followed by one
//! column per year. The whole table is small enough to hold in memory, so it
//! is parsed once at startup and queried by country name and year column.

use crate::error::SummaristError;

use csv::{ReaderBuilder, StringRecord};
use std::path::Path;

const COUNTRY_COLUMN: &str = "Country Name";

/// Per-country, per-year population counts.
pub struct Census {
    /// Year column names in file order.
    years: Vec<String>,
    countries: Vec<CountryRow>,
}

struct CountryRow {
    name: String,
    /// Aligned to `years`. `None` is an empty or unparseable cell.
    populations: Vec<Option<u64>>,
}

impl Census {
    pub fn load(path: &Path) -> Result<Self, SummaristError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .map_err(|source| SummaristError::csv(path, source))?;
        let headers = reader
            .headers()
            .map_err(|source| SummaristError::csv(path, source))?
            .clone();
        let name = position(&headers, COUNTRY_COLUMN, path)?;
        // Year columns are the all-digit headers; metadata columns like
        // "Country Code" fall out naturally.
        let year_columns: Vec<(usize, String)> = headers
            .iter()
            .enumerate()
            .filter(|(_, header)| !header.is_empty() && header.chars().all(|c| c.is_ascii_digit()))
            .map(|(index, header)| (index, header.to_string()))
            .collect();

        let mut countries = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|source| SummaristError::csv(path, source))?;
            let country = record.get(name).unwrap_or_default().trim();
            if country.is_empty() {
                continue;
            }
            let populations = year_columns
                .iter()
                .map(|(index, _)| {
                    record
                        .get(*index)
                        .and_then(|cell| cell.trim().parse().ok())
                })
                .collect();
            countries.push(CountryRow {
                name: country.to_string(),
                populations,
            });
        }
        Ok(Self {
            years: year_columns.into_iter().map(|(_, year)| year).collect(),
            countries,
        })
    }

    /// Population of `country` in `year`. Country names match
    /// case-insensitively. `Ok(None)` is a matched row with an empty cell.
    pub fn population(&self, country: &str, year: &str) -> Result<Option<u64>, SummaristError> {
        let row = self.find_country(country);
        let index = self.years.iter().position(|column| column == year);
        match (row, index) {
            (Some(row), Some(index)) => Ok(row.populations[index]),
            _ => Err(SummaristError::NotFound("Country or Year")),
        }
    }

    /// Sum of `country`'s population over every year, skipping empty cells.
    pub fn cumulative_country(&self, country: &str) -> Result<u64, SummaristError> {
        let row = self
            .find_country(country)
            .ok_or(SummaristError::NotFound("Country"))?;
        Ok(row.populations.iter().flatten().sum())
    }

    /// Sum of every country's population in `year`, skipping empty cells.
    pub fn cumulative_year(&self, year: &str) -> Result<u64, SummaristError> {
        let index = self
            .years
            .iter()
            .position(|column| column == year)
            .ok_or(SummaristError::NotFound("Year"))?;
        Ok(self
            .countries
            .iter()
            .filter_map(|row| row.populations[index])
            .sum())
    }

    fn find_country(&self, country: &str) -> Option<&CountryRow> {
        self.countries
            .iter()
            .find(|row| row.name.eq_ignore_ascii_case(country))
    }
}

fn position(headers: &StringRecord, column: &str, path: &Path) -> Result<usize, SummaristError> {
    headers
        .iter()
        .position(|header| header == column)
        .ok_or_else(|| SummaristError::column_missing(column, path))
}
