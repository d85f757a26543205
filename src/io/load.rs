//! Artifact reading

use super::format::ArtifactFormat;
use super::model::{ModelState, ARTIFACT_VERSION};
use crate::{Error, Result};
use std::path::Path;

/// Read a persisted artifact.
///
/// The format is detected from the file extension. The artifact's format
/// version must match [`ARTIFACT_VERSION`]; migration across versions is
/// not supported.
pub fn load_state(path: impl AsRef<Path>) -> Result<ModelState> {
    let path = path.as_ref();

    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| Error::Serialization("artifact file has no extension".to_string()))?;
    let format = ArtifactFormat::from_extension(ext)
        .ok_or_else(|| Error::Serialization(format!("unsupported artifact extension: {ext}")))?;

    let content = std::fs::read_to_string(path)?;

    let state: ModelState = match format {
        ArtifactFormat::Json => serde_json::from_str(&content)
            .map_err(|e| Error::Serialization(format!("JSON decoding failed: {e}")))?,
        ArtifactFormat::Yaml => serde_yaml::from_str(&content)
            .map_err(|e| Error::Serialization(format!("YAML decoding failed: {e}")))?,
    };

    if state.metadata.format_version != ARTIFACT_VERSION {
        return Err(Error::Serialization(format!(
            "unsupported artifact version {} (expected {})",
            state.metadata.format_version, ARTIFACT_VERSION
        )));
    }

    Ok(state)
}
