//! Docker Compose and Rancher Compose configuration types
//!
//! Only the fields that take part in the Kubernetes translation are modelled;
//! everything else in the compose file is accepted and ignored.

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// Mapping that keeps the order entries were declared in the file
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V>(Vec<(String, V)>);

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<V> OrderedMap<V> {
    /// Look up a value by key
    pub fn get(&self, key: &str) -> Option<&V> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Whether the key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterate entries in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &V)> {
        self.0.iter().map(|(k, v)| (k, v))
    }

    /// Iterate keys in declaration order
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.iter().map(|(k, _)| k)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OrderedMapVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
            type Value = OrderedMap<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping")
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(OrderedMap::default())
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries: Vec<(String, V)> =
                    Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, V>()? {
                    // Later keys override earlier ones, keeping the first position
                    if let Some(slot) = entries.iter_mut().find(|entry| entry.0 == key) {
                        slot.1 = value;
                    } else {
                        entries.push((key, value));
                    }
                }
                Ok(OrderedMap(entries))
            }
        }

        deserializer.deserialize_any(OrderedMapVisitor(PhantomData))
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Docker Compose file configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComposeConfig {
    /// Compose file version
    #[serde(default)]
    pub version: Option<String>,
    /// Project name
    #[serde(default)]
    pub name: Option<String>,
    /// Services, in declaration order
    #[serde(default)]
    pub services: OrderedMap<ServiceConfig>,
}

/// Service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Image name
    #[serde(default)]
    pub image: Option<String>,
    /// Build context (only checked for presence)
    #[serde(default)]
    pub build: Option<serde_yaml::Value>,
    /// Command to run
    #[serde(default)]
    pub command: Option<CommandConfig>,
    /// Entrypoint
    #[serde(default)]
    pub entrypoint: Option<CommandConfig>,
    /// Environment variables
    #[serde(default)]
    pub environment: Option<EnvironmentConfig>,
    /// Port mappings
    #[serde(default)]
    pub ports: Option<Vec<PortConfig>>,
    /// Volume mounts
    #[serde(default)]
    pub volumes: Option<Vec<VolumeMount>>,
    /// Deploy configuration
    #[serde(default)]
    pub deploy: Option<DeployConfig>,
    /// Labels
    #[serde(default)]
    pub labels: Option<LabelsConfig>,
    /// Restart policy
    #[serde(default)]
    pub restart: Option<String>,
}

/// Scalar value as written in YAML (`8080`, `true`, `"text"`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Bool(b) => write!(f, "{}", b),
            ScalarValue::Int(i) => write!(f, "{}", i),
            ScalarValue::Float(x) => write!(f, "{}", x),
            ScalarValue::String(s) => write!(f, "{}", s),
        }
    }
}

/// Command configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CommandConfig {
    /// Shell command string
    Shell(String),
    /// Exec form array
    Exec(Vec<String>),
}

/// Environment configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnvironmentConfig {
    /// Array of KEY=value strings
    Array(Vec<String>),
    /// Map of key to value
    Map(OrderedMap<Option<ScalarValue>>),
}

/// Port configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PortConfig {
    /// Short syntax: "8080:80"
    Short(ScalarValue),
    /// Long syntax
    Long(PortConfigLong),
}

/// Long port configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortConfigLong {
    /// Target port in container
    pub target: u16,
    /// Published port on host
    pub published: Option<ScalarValue>,
    /// Protocol (tcp/udp)
    pub protocol: Option<String>,
}

/// Volume mount configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VolumeMount {
    /// Short syntax: "host:container:mode"
    Short(String),
    /// Long syntax
    Long(VolumeMountLong),
}

/// Long volume mount configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VolumeMountLong {
    /// Mount type (volume, bind, tmpfs)
    #[serde(rename = "type")]
    pub mount_type: Option<String>,
    /// Source path or volume name
    pub source: Option<String>,
    /// Target path in container
    pub target: String,
    /// Read only
    pub read_only: Option<bool>,
}

/// Deploy configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeployConfig {
    /// Number of replicas
    pub replicas: Option<u32>,
}

/// Labels configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LabelsConfig {
    /// Array of "key=value" strings
    Array(Vec<String>),
    /// Map of key to value
    Map(OrderedMap<ScalarValue>),
}

/// Rancher Compose file: per-service scheduling metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RancherComposeConfig {
    /// Services, in declaration order
    #[serde(default)]
    pub services: OrderedMap<RancherServiceConfig>,
}

/// Rancher metadata for one service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RancherServiceConfig {
    /// Desired container count
    #[serde(default)]
    pub scale: Option<u32>,
    /// Health check
    #[serde(default)]
    pub health_check: Option<RancherHealthCheck>,
}

/// Rancher health check. Durations are in milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RancherHealthCheck {
    pub port: Option<i32>,
    /// e.g. `GET "/healthcheck" "HTTP/1.0"`
    pub request_line: Option<String>,
    pub interval: Option<u64>,
    pub response_timeout: Option<u64>,
    pub initializing_timeout: Option<u64>,
    pub healthy_threshold: Option<i32>,
    pub unhealthy_threshold: Option<i32>,
    pub strategy: Option<String>,
}
