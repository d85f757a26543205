//! Serializable parameter state

use crate::nn::Param;
use crate::{Error, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Current artifact format version
pub const ARTIFACT_VERSION: u32 = 1;

/// Identity block stored alongside parameter values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Artifact name, usually the file stem
    pub name: String,
    /// Architecture identity of the producing module
    pub architecture: String,
    /// Artifact format version
    pub format_version: u32,
}

impl ModelMetadata {
    pub fn new(name: impl Into<String>, architecture: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            architecture: architecture.into(),
            format_version: ARTIFACT_VERSION,
        }
    }
}

/// Shape and flags for one persisted parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterInfo {
    /// Parameter name, e.g. `fc1.weight`
    pub name: String,
    /// Logical shape
    pub shape: Vec<usize>,
    /// Element type of the value buffer
    pub dtype: String,
}

impl ParameterInfo {
    pub fn count(&self) -> usize {
        self.shape.iter().product()
    }
}

/// Complete serializable parameter state: metadata, per-parameter shape
/// info, and all values concatenated in parameter order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelState {
    pub metadata: ModelMetadata,
    pub parameters: Vec<ParameterInfo>,
    pub data: Vec<f32>,
}

impl ModelState {
    /// Snapshot a module's parameter list
    pub fn from_params(name: &str, architecture: &str, params: &[Param]) -> Self {
        let mut data = Vec::new();
        let parameters: Vec<ParameterInfo> = params
            .iter()
            .map(|p| {
                let values = p.tensor.data();
                data.extend_from_slice(values.as_slice().expect("parameter must be contiguous"));
                ParameterInfo {
                    name: p.name.clone(),
                    shape: p.shape.clone(),
                    dtype: "f32".to_string(),
                }
            })
            .collect();

        Self {
            metadata: ModelMetadata::new(name, architecture),
            parameters,
            data,
        }
    }

    /// Check that this artifact's name→shape mapping matches `params`
    /// exactly: same parameter set, same shapes, consistent value buffer.
    pub fn validate_against(&self, params: &[Param]) -> Result<()> {
        if self.parameters.len() != params.len() {
            return Err(Error::StructuralMismatch(format!(
                "artifact holds {} parameters, module expects {}",
                self.parameters.len(),
                params.len()
            )));
        }

        for expected in params {
            let Some(stored) = self.parameters.iter().find(|p| p.name == expected.name) else {
                return Err(Error::StructuralMismatch(format!(
                    "parameter '{}' missing from artifact",
                    expected.name
                )));
            };
            if stored.shape != expected.shape {
                return Err(Error::StructuralMismatch(format!(
                    "parameter '{}': expected shape {:?}, artifact has {:?}",
                    expected.name, expected.shape, stored.shape
                )));
            }
        }

        let total: usize = self.parameters.iter().map(ParameterInfo::count).sum();
        if total != self.data.len() {
            return Err(Error::StructuralMismatch(format!(
                "artifact declares {} values but carries {}",
                total,
                self.data.len()
            )));
        }

        Ok(())
    }

    /// Copy the artifact's values into the matching parameters.
    ///
    /// Call [`validate_against`](ModelState::validate_against) first; this
    /// resolves values by name and fails if a parameter is absent.
    pub fn apply_to(&self, params: &[Param]) -> Result<()> {
        let mut offsets = std::collections::HashMap::new();
        let mut offset = 0;
        for info in &self.parameters {
            offsets.insert(info.name.as_str(), (offset, info.count()));
            offset += info.count();
        }

        for param in params {
            let Some(&(start, count)) = offsets.get(param.name.as_str()) else {
                return Err(Error::StructuralMismatch(format!(
                    "parameter '{}' missing from artifact",
                    param.name
                )));
            };
            let values = &self.data[start..start + count];
            *param.tensor.data_mut() = Array1::from(values.to_vec());
        }

        Ok(())
    }
}
