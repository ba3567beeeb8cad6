//! Docker Compose input
//!
//! Reads `docker-compose.yml` and the optional `rancher-compose.yml`, and
//! flattens every service into a [`ServiceDescriptor`] for translation.

pub mod config;
pub mod descriptor;
pub mod parser;

pub use config::{ComposeConfig, RancherComposeConfig, RancherServiceConfig, ServiceConfig};
pub use descriptor::{ComposeProject, ServiceDescriptor};
pub use parser::ComposeParser;
