//! Flattened, translation-ready view of one compose service

use super::config::{
    CommandConfig, ComposeConfig, EnvironmentConfig, LabelsConfig, PortConfig,
    RancherComposeConfig, RancherServiceConfig, ServiceConfig, VolumeMount,
};
use crate::error::{KubifyError, Result};
use serde::Serialize;
use std::collections::BTreeMap;

/// One compose service with every attribute reduced to its string form
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ServiceDescriptor {
    /// Service name as declared in the compose file
    pub name: String,
    /// Container image reference
    pub image: String,
    /// Arguments (compose `command`)
    pub command: Vec<String>,
    /// Entrypoint (compose `entrypoint`)
    pub entrypoint: Vec<String>,
    /// Port strings, `container` or `host:container`
    pub ports: Vec<String>,
    /// `KEY=VALUE` assignments
    pub environment: Vec<String>,
    /// Labels
    pub labels: BTreeMap<String, String>,
    /// Volume strings, `host:container[:mode]`
    pub volumes: Vec<String>,
    /// Restart policy as written
    pub restart: String,
    /// `deploy.replicas`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replicas: Option<u32>,
    /// Matching rancher-compose entry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rancher: Option<RancherServiceConfig>,
}

impl ServiceDescriptor {
    /// Create an empty descriptor for an image
    pub fn new(name: &str, image: &str) -> Self {
        Self {
            name: name.to_string(),
            image: image.to_string(),
            ..Self::default()
        }
    }

    /// Flatten a parsed compose service
    pub fn from_config(
        name: &str,
        service: &ServiceConfig,
        rancher: Option<&RancherServiceConfig>,
    ) -> Result<Self> {
        let image = service.image.clone().unwrap_or_else(|| {
            tracing::warn!("Service {} has no image, using the service name as image", name);
            name.to_string()
        });

        Ok(Self {
            name: name.to_string(),
            image,
            command: command_args(name, service.command.as_ref())?,
            entrypoint: command_args(name, service.entrypoint.as_ref())?,
            ports: service
                .ports
                .iter()
                .flatten()
                .map(port_string)
                .collect(),
            environment: service
                .environment
                .as_ref()
                .map(environment_strings)
                .unwrap_or_default(),
            labels: service.labels.as_ref().map(label_map).unwrap_or_default(),
            volumes: service
                .volumes
                .iter()
                .flatten()
                .map(volume_string)
                .collect(),
            restart: service.restart.clone().unwrap_or_default(),
            replicas: service.deploy.as_ref().and_then(|d| d.replicas),
            rancher: rancher.cloned(),
        })
    }
}

/// A compose project reduced to descriptors
#[derive(Debug, Clone, Default)]
pub struct ComposeProject {
    /// Services in declaration order
    pub services: Vec<ServiceDescriptor>,
    /// rancher-compose entries with no matching compose service
    pub unmatched_rancher: Vec<String>,
}

impl ComposeProject {
    /// Pair compose services with their rancher-compose metadata
    pub fn new(compose: &ComposeConfig, rancher: &RancherComposeConfig) -> Result<Self> {
        let services = compose
            .services
            .iter()
            .map(|(name, service)| {
                ServiceDescriptor::from_config(name, service, rancher.services.get(name))
            })
            .collect::<Result<Vec<_>>>()?;

        let unmatched_rancher = rancher
            .services
            .keys()
            .filter(|name| !compose.services.contains_key(name))
            .cloned()
            .collect();

        Ok(Self {
            services,
            unmatched_rancher,
        })
    }
}

/// Shell-form commands are split with POSIX shell quoting rules
fn command_args(service: &str, command: Option<&CommandConfig>) -> Result<Vec<String>> {
    match command {
        None => Ok(Vec::new()),
        Some(CommandConfig::Exec(arr)) => Ok(arr.clone()),
        Some(CommandConfig::Shell(s)) => {
            shlex::split(s).ok_or_else(|| KubifyError::InvalidCommand {
                service: service.to_string(),
                command: s.clone(),
            })
        }
    }
}

fn port_string(port: &PortConfig) -> String {
    match port {
        PortConfig::Short(value) => value.to_string(),
        PortConfig::Long(long) => match &long.published {
            Some(published) => format!("{}:{}", published, long.target),
            None => long.target.to_string(),
        },
    }
}

fn environment_strings(env: &EnvironmentConfig) -> Vec<String> {
    match env {
        EnvironmentConfig::Array(arr) => arr.clone(),
        EnvironmentConfig::Map(map) => map
            .iter()
            .map(|(key, value)| match value {
                Some(v) => format!("{}={}", key, v),
                None => key.clone(),
            })
            .collect(),
    }
}

fn label_map(labels: &LabelsConfig) -> BTreeMap<String, String> {
    match labels {
        LabelsConfig::Array(arr) => arr
            .iter()
            .map(|item| match item.split_once('=') {
                Some((k, v)) => (k.to_string(), v.to_string()),
                None => (item.clone(), String::new()),
            })
            .collect(),
        LabelsConfig::Map(map) => map
            .iter()
            .map(|(k, v)| (k.clone(), v.to_string()))
            .collect(),
    }
}

fn volume_string(volume: &VolumeMount) -> String {
    match volume {
        VolumeMount::Short(s) => s.clone(),
        VolumeMount::Long(long) => {
            let mut spec = match &long.source {
                Some(source) => format!("{}:{}", source, long.target),
                None => long.target.clone(),
            };
            if long.read_only == Some(true) {
                spec.push_str(":ro");
            }
            spec
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::parser::ComposeParser;

    fn shell(command: &str) -> Result<Vec<String>> {
        command_args("web", Some(&CommandConfig::Shell(command.to_string())))
    }

    #[test]
    fn test_shell_command_words() {
        assert_eq!(shell("nginx -g 'daemon off;'").unwrap(), vec!["nginx", "-g", "daemon off;"]);
        assert_eq!(shell("  echo \"a b\"  c\\ d ").unwrap(), vec!["echo", "a b", "c d"]);
        assert_eq!(shell("run ''").unwrap(), vec!["run", ""]);
        assert_eq!(shell(r#"printf "a\b""#).unwrap(), vec!["printf", r"a\b"]);
        assert!(shell("   ").unwrap().is_empty());
    }

    #[test]
    fn test_unterminated_quote_is_rejected() {
        let err = shell("echo 'abc").unwrap_err();
        assert!(matches!(err, KubifyError::InvalidCommand { ref service, .. } if service == "web"));

        let compose = ComposeParser::parse_str("services:\n  web:\n    image: nginx\n    command: echo \"abc\n").unwrap();
        assert!(ComposeProject::new(&compose, &Default::default()).is_err());
    }

    #[test]
    fn test_from_config_flattens_fields() {
        let yaml = r#"
services:
  web:
    image: nginx
    command: nginx -g 'daemon off;'
    entrypoint: ["/docker-entrypoint.sh"]
    ports:
      - "80:8080"
      - target: 443
        published: 8443
    environment:
      MODE: production
      WORKERS: 4
    labels:
      - env=prod
    volumes:
      - /data:/var/lib/data:ro
      - type: bind
        source: /logs
        target: /var/log
    restart: on-failure
    deploy:
      replicas: 3
"#;
        let config = ComposeParser::parse_str(yaml).unwrap();
        let service = config.services.get("web").unwrap();
        let descriptor = ServiceDescriptor::from_config("web", service, None).unwrap();

        assert_eq!(descriptor.image, "nginx");
        assert_eq!(descriptor.command, vec!["nginx", "-g", "daemon off;"]);
        assert_eq!(descriptor.entrypoint, vec!["/docker-entrypoint.sh"]);
        assert_eq!(descriptor.ports, vec!["80:8080", "8443:443"]);
        assert_eq!(descriptor.environment, vec!["MODE=production", "WORKERS=4"]);
        assert_eq!(descriptor.labels.get("env"), Some(&"prod".to_string()));
        assert_eq!(descriptor.volumes, vec!["/data:/var/lib/data:ro", "/logs:/var/log"]);
        assert_eq!(descriptor.restart, "on-failure");
        assert_eq!(descriptor.replicas, Some(3));
        assert!(descriptor.rancher.is_none());
    }

    #[test]
    fn test_missing_image_falls_back_to_name() {
        let service = ServiceConfig::default();
        let descriptor = ServiceDescriptor::from_config("worker", &service, None).unwrap();
        assert_eq!(descriptor.image, "worker");
    }

    #[test]
    fn test_project_pairs_rancher_metadata() {
        let compose = ComposeParser::parse_str(
            r#"
services:
  web:
    image: nginx
  db:
    image: postgres
"#,
        )
        .unwrap();
        let rancher = ComposeParser::parse_rancher_str(
            r#"
web:
  scale: 2
cache:
  scale: 1
"#,
        )
        .unwrap();

        let project = ComposeProject::new(&compose, &rancher).unwrap();

        let names: Vec<&str> = project.services.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["web", "db"]);
        assert_eq!(project.services[0].rancher.as_ref().unwrap().scale, Some(2));
        assert!(project.services[1].rancher.is_none());
        assert_eq!(project.unmatched_rancher, vec!["cache"]);
    }
}
