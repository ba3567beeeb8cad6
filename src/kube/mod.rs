//! Kubernetes resource types emitted by kubify
//!
//! - ReplicationController: one per compose service
//! - Service: network exposure paired with each controller
//!
//! Only the fields kubify populates are modelled. Empty collections and
//! unset optionals are omitted from the output.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Label key tying a controller, its pods and its Service together
pub const SERVICE_LABEL: &str = "service";

// =============================================================================
// Metadata
// =============================================================================

/// Standard Kubernetes ObjectMeta
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    /// Resource name
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Resource namespace
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    /// Labels
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

impl ObjectMeta {
    /// Metadata carrying the `service` label
    pub fn new(name: &str, namespace: &str) -> Self {
        Self {
            name: name.to_string(),
            namespace: namespace.to_string(),
            labels: service_selector(name),
        }
    }
}

/// `{service: <name>}`
pub fn service_selector(name: &str) -> BTreeMap<String, String> {
    BTreeMap::from([(SERVICE_LABEL.to_string(), name.to_string())])
}

// =============================================================================
// ReplicationController
// =============================================================================

/// Kubernetes ReplicationController
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReplicationController {
    /// API version
    pub api_version: String,
    /// Kind
    pub kind: String,
    /// Metadata
    pub metadata: ObjectMeta,
    /// Spec
    pub spec: ReplicationControllerSpec,
}

impl ReplicationController {
    pub const API_VERSION: &'static str = "v1";
    pub const KIND: &'static str = "ReplicationController";
}

/// ReplicationController spec
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReplicationControllerSpec {
    /// Desired replica count
    pub replicas: i32,
    /// Label selector
    pub selector: BTreeMap<String, String>,
    /// Pod template
    pub template: PodTemplateSpec,
}

/// Pod template spec
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PodTemplateSpec {
    /// Pod metadata
    pub metadata: ObjectMeta,
    /// Pod spec
    pub spec: PodSpec,
}

/// Pod spec
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PodSpec {
    /// Volumes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<Volume>,
    /// Containers
    pub containers: Vec<Container>,
    /// Restart policy
    pub restart_policy: RestartPolicy,
    /// Node selector
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub node_selector: BTreeMap<String, String>,
}

/// Pod restart policy
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum RestartPolicy {
    #[default]
    Always,
    OnFailure,
    Never,
}

/// Container spec
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    /// Container name
    pub name: String,
    /// Image
    pub image: String,
    /// Entrypoint
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub command: Vec<String>,
    /// Arguments to the entrypoint
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    /// Ports
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<ContainerPort>,
    /// Environment variables
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<EnvVar>,
    /// Volume mounts
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volume_mounts: Vec<VolumeMount>,
    /// Readiness probe
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readiness_probe: Option<Probe>,
}

/// Environment variable
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnvVar {
    /// Variable name
    pub name: String,
    /// Variable value
    #[serde(default)]
    pub value: String,
}

impl EnvVar {
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
        }
    }
}

/// Container port
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContainerPort {
    /// Port number
    pub container_port: i32,
}

/// Volume mount
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VolumeMount {
    /// Volume name
    pub name: String,
    /// Read only
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub read_only: bool,
    /// Mount path
    pub mount_path: String,
}

/// Volume
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    /// Volume name
    pub name: String,
    /// Host path source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_path: Option<HostPathVolumeSource>,
}

/// Host path volume source
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HostPathVolumeSource {
    /// Path on the node
    pub path: String,
}

/// Probe specification
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Probe {
    /// HTTP GET probe
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http_get: Option<HttpGetAction>,
    /// TCP probe
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcp_socket: Option<TcpSocketAction>,
    /// Initial delay seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_delay_seconds: Option<i32>,
    /// Timeout seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_seconds: Option<i32>,
    /// Period seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period_seconds: Option<i32>,
    /// Success threshold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_threshold: Option<i32>,
    /// Failure threshold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_threshold: Option<i32>,
}

/// HTTP GET action for probe
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HttpGetAction {
    /// Path
    pub path: String,
    /// Port
    pub port: i32,
}

/// TCP socket action for probe
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TcpSocketAction {
    /// Port
    pub port: i32,
}

// =============================================================================
// Service
// =============================================================================

/// Kubernetes Service
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// API version
    pub api_version: String,
    /// Kind
    pub kind: String,
    /// Metadata
    pub metadata: ObjectMeta,
    /// Spec
    pub spec: ServiceSpec,
}

impl Service {
    pub const API_VERSION: &'static str = "v1";
    pub const KIND: &'static str = "Service";
}

/// Service spec
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSpec {
    /// Service type
    #[serde(rename = "type")]
    pub type_: String,
    /// Selector
    pub selector: BTreeMap<String, String>,
    /// Ports
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<ServicePort>,
    /// Cluster IP; `None` makes the Service headless
    #[serde(rename = "clusterIP", default, skip_serializing_if = "Option::is_none")]
    pub cluster_ip: Option<String>,
}

/// Service port
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServicePort {
    /// Port name
    pub name: String,
    /// Protocol
    pub protocol: String,
    /// Port number
    pub port: i32,
    /// Target port
    pub target_port: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restart_policy_wire_names() {
        assert_eq!(serde_json::to_string(&RestartPolicy::Always).unwrap(), "\"Always\"");
        assert_eq!(serde_json::to_string(&RestartPolicy::OnFailure).unwrap(), "\"OnFailure\"");
        assert_eq!(serde_json::to_string(&RestartPolicy::Never).unwrap(), "\"Never\"");
    }

    #[test]
    fn test_container_omits_empty_fields() {
        let container = Container {
            name: "web".to_string(),
            image: "nginx".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&container).unwrap();
        assert_eq!(json, serde_json::json!({"name": "web", "image": "nginx"}));
    }

    #[test]
    fn test_camel_case_fields() {
        let mount = VolumeMount {
            name: "data".to_string(),
            read_only: true,
            mount_path: "/data".to_string(),
        };
        let json = serde_json::to_value(&mount).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "data", "readOnly": true, "mountPath": "/data"})
        );
    }
}
