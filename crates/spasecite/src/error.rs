//! Error types for the spasecite library.
//!
//! This module provides a single error type covering every failure mode of
//! the SPASE-to-DataCite pipeline:
//! - Reading and scraping SPASE XML records
//! - Validating mapped DataCite records before submission
//! - Talking to the DataCite REST API
//! - Local record storage
//!
//! # Examples
//!
//! ```
//! use spasecite::{error::SpaseciteError, spase::SpaseResource};
//!
//! let result = SpaseResource::from_xml_str("<notspase/>");
//! match result {
//!   Err(SpaseciteError::InvalidResource(msg)) => println!("Bad record: {msg}"),
//!   Err(e) => println!("Other error: {e}"),
//!   Ok(_) => println!("Parsed!"),
//! }
//! ```

use thiserror::Error;

/// Error type alias used for the [`spasecite`](crate) crate.
pub type Result<T> = core::result::Result<T, SpaseciteError>;

/// Errors that can occur when converting SPASE records and registering DOIs.
///
/// Most variants provide additional context through either custom messages
/// or wrapped underlying errors. There is deliberately no retry machinery
/// behind any of these: a failure is reported to the caller for manual
/// correction and resubmission.
#[derive(Error, Debug)]
pub enum SpaseciteError {
  /// The input document is not a usable SPASE resource description.
  ///
  /// This can occur when:
  /// - The file is not XML or lacks the `Spase` root element
  /// - No resource description element (NumericalData, DisplayData,
  ///   Observatory, Instrument, Collection, Person) is present
  #[error("Invalid SPASE resource: {0}")]
  InvalidResource(String),

  /// A field required by the DataCite schema is absent from the SPASE record.
  ///
  /// The string names the SPASE location that should have provided the value.
  /// Validation happens before any API submission so a partial record is
  /// never sent to DataCite.
  #[error("Missing required SPASE field: {0}")]
  MissingField(String),

  /// A network request failed.
  ///
  /// Covers unreachable hosts, timeouts, and TLS failures for both SPASE
  /// record fetches and DataCite API calls.
  #[error(transparent)]
  Network(#[from] reqwest::Error),

  /// The DataCite API returned a non-success status.
  ///
  /// The response body is carried verbatim so the user can correct the
  /// record and resubmit. Authentication and validation failures from
  /// DataCite both surface here.
  #[error("DataCite API error ({status}): {message}")]
  Api {
    /// HTTP status code returned by the API.
    status:  u16,
    /// Response body, typically a JSON:API error document.
    message: String,
  },

  /// The requested DOI does not exist at DataCite.
  #[error("DOI not found")]
  NotFound,

  /// A URL could not be parsed.
  #[error(transparent)]
  InvalidUrl(#[from] url::ParseError),

  /// A file system operation failed.
  #[error(transparent)]
  Io(#[from] std::io::Error),

  /// JSON serialization or deserialization failed.
  #[error(transparent)]
  Json(#[from] serde_json::Error),
}
