//! Error types for the spasecite CLI.

use spasecite::error::SpaseciteError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = core::result::Result<T, SpasecitedError>;

/// Errors surfaced by the CLI on top of the library's own.
#[derive(Error, Debug)]
pub enum SpasecitedError {
  /// An error from the spasecite library.
  #[error(transparent)]
  Spasecite(#[from] SpaseciteError),

  /// An interactive prompt failed, e.g. stdin closed.
  #[error(transparent)]
  Dialoguer(#[from] dialoguer::Error),

  /// No DataCite credentials available in a non-interactive run.
  #[error(
    "DataCite credentials required: set DATACITE_USERNAME and DATACITE_PASSWORD or run without \
     --accept-defaults"
  )]
  MissingCredentials,

  /// A file system operation failed.
  #[error(transparent)]
  Io(#[from] std::io::Error),

  /// JSON serialization failed.
  #[error(transparent)]
  Json(#[from] serde_json::Error),
}
