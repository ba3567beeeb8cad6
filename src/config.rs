//! Conversion settings shared by the translator, the writer and the orchestrator

use std::path::PathBuf;

/// Namespace used when none is configured
pub const DEFAULT_NAMESPACE: &str = "default";

/// Directory manifests are written to when none is configured
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Manifest output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Strict, machine-readable JSON
    Json,
    /// Human-editable YAML
    #[default]
    Yaml,
}

impl OutputFormat {
    /// File extension for manifests in this format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yml",
        }
    }
}

/// Settings for one conversion run
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// Namespace stamped on every generated resource
    pub namespace: String,
    /// Directory manifests are written to
    pub output_dir: PathBuf,
    /// Manifest format
    pub format: OutputFormat,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            format: OutputFormat::default(),
        }
    }
}

impl ConvertConfig {
    /// Create a config with the default namespace and format
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    /// Set the namespace
    pub fn namespace(mut self, namespace: &str) -> Self {
        self.namespace = namespace.to_string();
        self
    }

    /// Set the output format
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }
}
