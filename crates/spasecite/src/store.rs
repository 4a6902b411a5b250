//! Local storage for converted DataCite records.
//!
//! Converted records live on disk as pretty-printed JSON, mirroring the
//! SPASE resource-ID hierarchy under a store root:
//! `spase://NASA/NumericalData/ACE/MAG/L2/PT16S` is written to
//! `<root>/NASA/NumericalData/ACE/MAG/L2/PT16S.json`. Because mapping is
//! deterministic, regenerating a record and diffing it against the stored
//! copy shows exactly what changed in the source metadata.
//!
//! Removal prunes directories that become empty, so deleting the last
//! record of a mission cleans up its whole subtree without ever touching
//! the store root.

use crate::datacite::DataCiteRecord;

use super::*;

/// The on-disk path for a resource ID under a store root.
///
/// # Errors
///
/// Returns [`SpaseciteError::InvalidResource`] when the ID would map outside
/// the store root, e.g. through `..` segments or an absolute path.
pub fn record_path(root: impl AsRef<Path>, resource_id: &str) -> Result<PathBuf> {
  let relative = resource_id.trim().replacen("spase://", "", 1);
  let contained = !relative.is_empty()
    && Path::new(&relative)
      .components()
      .all(|c| matches!(c, std::path::Component::Normal(_)));
  if !contained {
    return Err(SpaseciteError::InvalidResource(format!(
      "resource ID {resource_id} does not map to a path inside the store"
    )));
  }
  Ok(root.as_ref().join(format!("{relative}.json")))
}

/// Writes a record to the store, creating parent directories as needed.
/// Returns the path written.
///
/// # Errors
///
/// Returns [`SpaseciteError::Io`] for filesystem failures,
/// [`SpaseciteError::Json`] if the record cannot be serialized, and
/// [`SpaseciteError::InvalidResource`] for IDs that escape the store root.
pub fn save(
  record: &DataCiteRecord,
  root: impl AsRef<Path>,
  resource_id: &str,
) -> Result<PathBuf> {
  let path = record_path(&root, resource_id)?;
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent)?;
  }
  std::fs::write(&path, record.to_json_pretty()?)?;
  debug!("Saved record to {}", path.display());
  Ok(path)
}

/// Reads a stored record back.
///
/// # Errors
///
/// Returns [`SpaseciteError::Io`] if the file cannot be read and
/// [`SpaseciteError::Json`] if it does not deserialize as a record.
pub fn load(path: impl AsRef<Path>) -> Result<DataCiteRecord> {
  let content = std::fs::read_to_string(path)?;
  Ok(serde_json::from_str(&content)?)
}

/// Deletes a stored record and prunes parent directories that become empty,
/// stopping at the store root. Returns the path removed.
///
/// # Errors
///
/// Returns [`SpaseciteError::Io`] if the record does not exist or cannot be
/// removed, and [`SpaseciteError::InvalidResource`] for IDs that escape the
/// store root.
pub fn remove(root: impl AsRef<Path>, resource_id: &str) -> Result<PathBuf> {
  let root = root.as_ref();
  let path = record_path(root, resource_id)?;
  std::fs::remove_file(&path)?;
  debug!("Removed record {}", path.display());

  let mut dir = path.parent();
  while let Some(current) = dir {
    if current == root || !is_empty_dir(current)? {
      break;
    }
    std::fs::remove_dir(current)?;
    trace!("Pruned empty directory {}", current.display());
    dir = current.parent();
  }
  Ok(path)
}

/// Whether a directory exists and contains no entries.
fn is_empty_dir(path: &Path) -> Result<bool> {
  Ok(path.is_dir() && std::fs::read_dir(path)?.next().is_none())
}
