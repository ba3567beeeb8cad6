//! Companion Service construction

use crate::compose::ServiceDescriptor;
use crate::kube::{ObjectMeta, ReplicationController, Service, ServicePort, ServiceSpec};

/// Build the Service exposing a controller's pods.
///
/// Every distinct container port is published over TCP on the same
/// number. A controller without ports gets a headless Service so its pods
/// stay resolvable by name.
pub fn build_service(
    short_name: &str,
    service: &ServiceDescriptor,
    rc: &ReplicationController,
) -> Service {
    let mut ports: Vec<ServicePort> = Vec::new();
    for container in &rc.spec.template.spec.containers {
        for port in &container.ports {
            if ports.iter().any(|p| p.port == port.container_port) {
                continue;
            }
            ports.push(ServicePort {
                name: format!("port-{}", port.container_port),
                protocol: "TCP".to_string(),
                port: port.container_port,
                target_port: port.container_port,
            });
        }
    }

    let cluster_ip = if ports.is_empty() {
        tracing::debug!("Service {} exposes no ports, generating a headless service", service.name);
        Some("None".to_string())
    } else {
        None
    };

    Service {
        api_version: Service::API_VERSION.to_string(),
        kind: Service::KIND.to_string(),
        metadata: ObjectMeta::new(short_name, &rc.metadata.namespace),
        spec: ServiceSpec {
            type_: "ClusterIP".to_string(),
            selector: rc.spec.selector.clone(),
            ports,
            cluster_ip,
        },
    }
}
