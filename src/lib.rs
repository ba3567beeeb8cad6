//! kubify - convert Docker Compose projects into Kubernetes manifests
//!
//! Every compose service becomes a ReplicationController and a companion
//! Service, written as JSON or YAML. Rancher Compose metadata (`scale`,
//! `health_check`) and Rancher scheduler labels are honoured where
//! Kubernetes has an equivalent.

pub mod compose;
pub mod config;
pub mod error;
pub mod kube;
pub mod orchestrator;
pub mod output;
pub mod translate;

pub use config::{ConvertConfig, OutputFormat};
pub use error::{KubifyError, Result};
pub use orchestrator::Orchestrator;
