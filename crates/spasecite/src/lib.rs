//! SPASE metadata conversion and DOI registration library.
//!
//! `spasecite` turns SPASE (Space Physics Archive Search and Extract) XML
//! resource descriptions into DataCite JSON records and registers them as
//! DOIs, providing:
//!
//! - SPASE record scraping from files, strings, or URLs
//! - Field mapping into DataCite's JSON:API schema
//! - A DataCite REST client (draft, register, publish, hide, delete)
//! - A local JSON record store mirroring the SPASE resource-ID hierarchy
//!
//! # Getting Started
//!
//! ```no_run
//! use spasecite::{
//!   datacite::map::{map_resource, MapOptions},
//!   prelude::*,
//!   spase::SpaseResource,
//! };
//!
//! fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!   // Scrape a SPASE record
//!   let resource = SpaseResource::from_file("PT16S.xml")?;
//!
//!   // Map it into a DataCite record
//!   let record = map_resource(&resource, &MapOptions::default())?;
//!
//!   // Save it next to the rest of the converted archive
//!   let path = spasecite::store::save(&record, "dois", &resource.resource_id)?;
//!   println!("Wrote {}", path.display());
//!   Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`spase`]: SPASE resource types and the XML scraper
//! - [`datacite`]: DataCite record model, field mapper, and REST client
//! - [`store`]: Local JSON record storage
//! - [`error`]: Error types and the crate [`Result`](error::Result) alias
//! - [`prelude`]: Common types for ergonomic imports
//!
//! # Design Philosophy
//!
//! Conversion is deterministic and side-effect free: mapping the same SPASE
//! record twice produces byte-identical JSON, so converted archives can be
//! regenerated and diffed. Failures are reported, never retried; a record
//! that cannot be mapped or submitted is left for manual correction.

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::{
  fmt::Display,
  path::{Path, PathBuf},
};

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

pub mod datacite;
pub mod error;
pub mod spase;
pub mod store;

use crate::error::*;

/// Common types for ergonomic imports.
///
/// # Usage
///
/// ```no_run
/// use spasecite::{prelude::*, spase::SpaseResource};
///
/// fn example() -> Result<()> {
///   let resource = SpaseResource::from_xml_str("<Spase>...</Spase>")?;
///   Ok(())
/// }
/// ```
pub mod prelude {
  pub use crate::error::{Result, SpaseciteError};
}
