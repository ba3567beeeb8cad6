//! Port mapping

use crate::error::{KubifyError, Result};
use crate::kube::ContainerPort;

/// Map compose port strings to container ports.
///
/// For `host:container` mappings only the container side is kept. The port
/// is always the part after the last colon, so `ip:host:container` yields
/// the container port rather than the host port in the middle.
pub fn map_ports(service: &str, ports: &[String]) -> Result<Vec<ContainerPort>> {
    ports
        .iter()
        .map(|port| {
            container_port(port)
                .map(|container_port| ContainerPort { container_port })
                .ok_or_else(|| KubifyError::InvalidPort {
                    service: service.to_string(),
                    port: port.clone(),
                })
        })
        .collect()
}

fn container_port(port: &str) -> Option<i32> {
    let port = port.trim_matches('"').trim();
    let port = match port.rsplit_once(':') {
        Some((_, container)) => container,
        None => port,
    };
    port.parse().ok()
}
