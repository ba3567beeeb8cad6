//! Compose service to Kubernetes translation
//!
//! Each submodule maps one service attribute; [`ControllerTranslator`]
//! composes them into a ReplicationController.

pub mod env;
pub mod labels;
pub mod name;
pub mod ports;
pub mod probe;
pub mod restart;
pub mod scale;
pub mod service;
pub mod volumes;

pub use name::short_name;
pub use service::build_service;

use crate::compose::ServiceDescriptor;
use crate::config::ConvertConfig;
use crate::error::Result;
use crate::kube::{
    service_selector, Container, ObjectMeta, PodSpec, PodTemplateSpec, ReplicationController,
    ReplicationControllerSpec,
};

/// Builds ReplicationControllers from service descriptors
#[derive(Debug, Clone)]
pub struct ControllerTranslator {
    namespace: String,
}

impl ControllerTranslator {
    /// Create a translator stamping resources with the configured namespace
    pub fn new(config: &ConvertConfig) -> Self {
        Self {
            namespace: config.namespace.clone(),
        }
    }

    /// Translate one service. `short_name` names the controller, its
    /// container and its selector.
    pub fn translate(
        &self,
        service: &ServiceDescriptor,
        short_name: &str,
    ) -> Result<ReplicationController> {
        let name = service.name.as_str();
        tracing::debug!("Translating service {} as {}", name, short_name);

        let (volume_mounts, volumes) = volumes::map_volumes(name, &service.volumes)?;

        let container = Container {
            name: short_name.to_string(),
            image: service.image.clone(),
            command: service.entrypoint.clone(),
            args: service.command.clone(),
            ports: ports::map_ports(name, &service.ports)?,
            env: env::map_environment(&self.namespace, &service.environment),
            volume_mounts,
            readiness_probe: probe::readiness_probe(service)?,
        };

        let template = PodTemplateSpec {
            metadata: ObjectMeta {
                labels: labels::map_labels(short_name, &service.labels),
                ..Default::default()
            },
            spec: PodSpec {
                volumes,
                containers: vec![container],
                restart_policy: restart::map_restart_policy(name, &service.restart)?,
                node_selector: labels::map_affinity(name, &service.labels),
            },
        };

        Ok(ReplicationController {
            api_version: ReplicationController::API_VERSION.to_string(),
            kind: ReplicationController::KIND.to_string(),
            metadata: ObjectMeta::new(short_name, &self.namespace),
            spec: ReplicationControllerSpec {
                replicas: scale::resolve_replicas(service),
                selector: service_selector(short_name),
                template,
            },
        })
    }
}
