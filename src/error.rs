//! Error types for kubify

use thiserror::Error;

/// Result type for kubify operations
pub type Result<T> = std::result::Result<T, KubifyError>;

/// kubify error types
#[derive(Error, Debug)]
pub enum KubifyError {
    #[error("Invalid container port {port} for service {service}")]
    InvalidPort { service: String, port: String },

    #[error("Volumes without host path are not supported: {spec} (service {service})")]
    InvalidVolume { service: String, spec: String },

    #[error("Unknown restart policy {policy} for service {service}")]
    UnknownRestartPolicy { service: String, policy: String },

    #[error("Invalid command {command} for service {service}: unterminated quote or escape")]
    InvalidCommand { service: String, command: String },

    #[error("Invalid health check for service {service}: {message}")]
    InvalidHealthCheck { service: String, message: String },

    #[error("Compose file parse error: {0}")]
    ComposeParse(String),

    #[error("No service config found, aborting")]
    NoServices,

    #[error("Output error: {0}")]
    Output(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(String),
}
