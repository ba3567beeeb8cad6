//! Manifest serialization
//!
//! Resources are always encoded as JSON first. YAML output is derived from
//! that JSON and then passed through the fix-ups in [`yaml`].

pub mod yaml;

use crate::config::{ConvertConfig, OutputFormat};
use crate::error::{KubifyError, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// File suffix for ReplicationControllers
pub const CONTROLLER_SUFFIX: &str = "rc";

/// File suffix for Services
pub const SERVICE_SUFFIX: &str = "srv";

/// Writes resources as `<name>-<suffix>.<ext>` into the output directory
#[derive(Debug, Clone)]
pub struct ManifestWriter {
    output_dir: PathBuf,
    format: OutputFormat,
}

impl ManifestWriter {
    /// Create a writer for the configured directory and format
    pub fn new(config: &ConvertConfig) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            format: config.format,
        }
    }

    /// Output directory
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Create the output directory if it does not exist
    pub fn prepare(&self) -> Result<()> {
        std::fs::create_dir_all(&self.output_dir).map_err(|e| {
            KubifyError::Output(format!(
                "Failed to create the output directory {}: {}",
                self.output_dir.display(),
                e
            ))
        })
    }

    /// Path a resource is written to
    pub fn path_for(&self, short_name: &str, suffix: &str) -> PathBuf {
        self.output_dir.join(format!(
            "{}-{}.{}",
            short_name,
            suffix,
            self.format.extension()
        ))
    }

    /// Encode a resource in the configured format
    pub fn render<T: Serialize>(&self, resource: &T) -> Result<Vec<u8>> {
        let json = serde_json::to_vec_pretty(resource)?;

        match self.format {
            OutputFormat::Json => Ok(json),
            OutputFormat::Yaml => {
                let document: serde_json::Value = serde_json::from_slice(&json)?;
                let rendered = yaml::to_yaml(&document)?;
                let rendered = yaml::quote_env_values(&rendered)?;
                Ok(yaml::comment_external_name(&rendered).into_bytes())
            }
        }
    }

    /// Encode and write a resource, returning the written path
    pub fn write<T: Serialize>(&self, short_name: &str, suffix: &str, resource: &T) -> Result<PathBuf> {
        let data = self.render(resource).map_err(|e| {
            KubifyError::Output(format!(
                "Failed to marshal file {}-{}: {}",
                short_name, suffix, e
            ))
        })?;

        let path = self.path_for(short_name, suffix);
        std::fs::write(&path, data).map_err(|e| {
            KubifyError::Output(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        tracing::debug!("Wrote {}", path.display());
        Ok(path)
    }
}
