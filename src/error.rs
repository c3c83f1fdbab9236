//! Error handling.

use axum::{
    extract::rejection::QueryRejection,
    http::header,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::Path;
use thiserror::Error;
use tokio::sync::AcquireError;
use tracing::{event, Level};

/// Summarist server error type
///
/// This type encapsulates the various errors that may occur.
/// Each variant may result in a different API error response.
#[derive(Debug, Error)]
pub enum SummaristError {
    /// Error deserialising request query parameters
    #[error("request parameters are not valid")]
    QueryRejection(#[from] QueryRejection),

    /// Error validating request query parameters (single error)
    #[error("request parameters are not valid")]
    QueryValidationSingle(#[from] validator::ValidationError),

    /// Error validating request query parameters (multiple errors)
    #[error("request parameters are not valid")]
    QueryValidation(#[from] validator::ValidationErrors),

    /// A decoded file disagrees with the fixed dataset schema
    #[error("Column length mismatch in file {path}. Expected {expected} columns, found {actual} columns.")]
    SchemaMismatch {
        path: String,
        expected: usize,
        actual: usize,
    },

    /// A named column is absent from a file's header row
    #[error("column {column:?} not found in {path}")]
    ColumnMissing { column: String, path: String },

    /// Census lookup did not match a country or year
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Error reading a data file
    #[error("failed to read {path}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Error decoding CSV data
    #[error("failed to decode CSV data in {path}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    /// Error acquiring a semaphore
    #[error("error acquiring resources")]
    SemaphoreAcquireError(#[from] AcquireError),

    /// Error joining a blocking task
    #[error("error executing task")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl SummaristError {
    /// Wrap an I/O error with the path that produced it.
    pub fn file_read(path: &Path, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.display().to_string(),
            source,
        }
    }

    /// Wrap a CSV error with the path that produced it.
    pub fn csv(path: &Path, source: csv::Error) -> Self {
        Self::Csv {
            path: path.display().to_string(),
            source,
        }
    }

    /// A column required by a projection or reference table is absent.
    pub fn column_missing(column: &str, path: &Path) -> Self {
        Self::ColumnMissing {
            column: column.to_string(),
            path: path.display().to_string(),
        }
    }
}

impl IntoResponse for SummaristError {
    /// Convert from a `SummaristError` into an [axum::response::Response].
    fn into_response(self) -> Response {
        ErrorResponse::from(self).into_response()
    }
}

/// Body of error response
///
/// Implements serde (de)serialise.
#[derive(Deserialize, Serialize)]
struct ErrorBody {
    /// Main error message
    message: String,

    /// Optional list of causes
    #[serde(skip_serializing_if = "Option::is_none")]
    caused_by: Option<Vec<String>>,
}

impl ErrorBody {
    /// Return a new ErrorBody
    ///
    /// # Arguments
    ///
    /// * `error`: The error that occurred
    fn new<E>(error: &E) -> Self
    where
        E: std::error::Error + Send + Sync,
    {
        let message = error.to_string();
        let mut caused_by = None;
        let mut current = error.source();
        while let Some(source) = current {
            let mut causes: Vec<String> = caused_by.unwrap_or_default();
            causes.push(source.to_string());
            caused_by = Some(causes);
            current = source.source();
        }
        // Remove duplicate entries.
        if let Some(caused_by) = caused_by.as_mut() {
            caused_by.dedup()
        }
        ErrorBody { message, caused_by }
    }
}

/// A response to send in error cases
///
/// Implements serde (de)serialise.
#[derive(Deserialize, Serialize)]
struct ErrorResponse {
    /// HTTP status of the response
    #[serde(skip)]
    status: StatusCode,

    /// Response body
    error: ErrorBody,
}

impl ErrorResponse {
    /// Return a new ErrorResponse
    ///
    /// # Arguments
    ///
    /// * `status`: HTTP status of the response
    /// * `error`: The error that occurred. This will be formatted into a suitable `ErrorBody`
    fn new<E>(status: StatusCode, error: &E) -> Self
    where
        E: std::error::Error + Send + Sync,
    {
        ErrorResponse {
            status,
            error: ErrorBody::new(error),
        }
    }

    /// Return a 400 bad request ErrorResponse
    fn bad_request<E>(error: &E) -> Self
    where
        E: std::error::Error + Send + Sync,
    {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    /// Return a 404 not found ErrorResponse
    fn not_found<E>(error: &E) -> Self
    where
        E: std::error::Error + Send + Sync,
    {
        Self::new(StatusCode::NOT_FOUND, error)
    }

    /// Return a 500 internal server error ErrorResponse
    fn internal_server_error<E>(error: &E) -> Self
    where
        E: std::error::Error + Send + Sync,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, error)
    }
}

impl From<SummaristError> for ErrorResponse {
    /// Convert from a `SummaristError` into an `ErrorResponse`.
    fn from(error: SummaristError) -> Self {
        let response = match &error {
            // Bad request
            SummaristError::QueryRejection(_)
            | SummaristError::QueryValidationSingle(_)
            | SummaristError::QueryValidation(_)
            | SummaristError::SchemaMismatch { .. } => Self::bad_request(&error),

            // Not found
            SummaristError::NotFound(_) => Self::not_found(&error),

            // Internal server error
            SummaristError::ColumnMissing { .. }
            | SummaristError::FileRead { .. }
            | SummaristError::Csv { .. }
            | SummaristError::SemaphoreAcquireError(_)
            | SummaristError::TaskJoin(_) => Self::internal_server_error(&error),
        };

        // Log server errors.
        if response.status.is_server_error() {
            event!(Level::ERROR, "{}", error.to_string());
            let mut current = error.source();
            while let Some(source) = current {
                event!(Level::ERROR, "Caused by: {}", source.to_string());
                current = source.source();
            }
        }

        response
    }
}

impl IntoResponse for ErrorResponse {
    /// Convert from an `ErrorResponse` into an `axum::response::Response`.
    ///
    /// Renders the response as JSON.
    fn into_response(self) -> Response {
        let json_body = serde_json::to_string_pretty(&self);
        match json_body {
            Err(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to serialise error response: {}", err),
            )
                .into_response(),
            Ok(json_body) => (
                self.status,
                [(&header::CONTENT_TYPE, mime::APPLICATION_JSON.to_string())],
                json_body,
            )
                .into_response(),
        }
    }
}
