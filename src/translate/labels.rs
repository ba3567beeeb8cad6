//! Label and node-affinity mapping

use crate::kube::SERVICE_LABEL;
use std::collections::BTreeMap;

/// Labels under this prefix only mean something to the Rancher scheduler
pub const RANCHER_SCHEDULER_PREFIX: &str = "io.rancher.scheduler";

/// Rancher label pinning a service to hosts carrying a label
pub const HOST_LABEL_AFFINITY: &str = "io.rancher.scheduler.affinity:host_label";

/// Pod template labels: the compose labels plus `service=<short name>`.
///
/// Rancher scheduler labels are dropped.
pub fn map_labels(short_name: &str, labels: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    let mut mapped = BTreeMap::new();

    for (key, value) in labels {
        if key.contains(RANCHER_SCHEDULER_PREFIX) {
            tracing::info!("Ignoring label {}: {}", key, value);
        } else {
            mapped.insert(key.clone(), value.clone());
        }
    }

    mapped.insert(SERVICE_LABEL.to_string(), short_name.to_string());
    mapped
}

/// Node selector derived from the Rancher host-label affinity
pub fn map_affinity(service: &str, labels: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    let mut selector = BTreeMap::new();

    if let Some(value) = labels.get(HOST_LABEL_AFFINITY) {
        let parts: Vec<&str> = value.split('=').collect();
        match parts.as_slice() {
            [key, val] => {
                selector.insert(key.to_string(), val.to_string());
            }
            _ => tracing::warn!(
                "Wrong label value {}: {} for service {}",
                HOST_LABEL_AFFINITY,
                value,
                service
            ),
        }
    }

    selector
}
