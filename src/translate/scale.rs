//! Replica count resolution

use crate::compose::ServiceDescriptor;

/// Replicas: rancher-compose `scale`, then `deploy.replicas`, then 1
pub fn resolve_replicas(service: &ServiceDescriptor) -> i32 {
    let replicas = service
        .rancher
        .as_ref()
        .and_then(|r| r.scale)
        .or(service.replicas)
        .unwrap_or(1);

    i32::try_from(replicas).unwrap_or(i32::MAX)
}
