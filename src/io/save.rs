//! Atomic artifact writing

use super::format::{ArtifactFormat, SaveConfig};
use super::model::ModelState;
use crate::{Error, Result};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Serialize `state` to `path`, replacing any existing artifact.
///
/// The artifact is written to a temporary file in the destination
/// directory and atomically renamed into place, so a concurrent reader
/// never observes a partially written artifact.
pub fn save_state(state: &ModelState, path: impl AsRef<Path>, config: &SaveConfig) -> Result<()> {
    let path = path.as_ref();

    let encoded = match config.format {
        ArtifactFormat::Json => {
            if config.pretty {
                serde_json::to_string_pretty(state)
                    .map_err(|e| Error::Serialization(format!("JSON encoding failed: {e}")))?
            } else {
                serde_json::to_string(state)
                    .map_err(|e| Error::Serialization(format!("JSON encoding failed: {e}")))?
            }
        }
        ArtifactFormat::Yaml => serde_yaml::to_string(state)
            .map_err(|e| Error::Serialization(format!("YAML encoding failed: {e}")))?,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(encoded.as_bytes())?;
    tmp.persist(path).map_err(|e| Error::Io(e.error))?;

    Ok(())
}
