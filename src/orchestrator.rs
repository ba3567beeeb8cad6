//! Conversion orchestrator: drives translation and output for every service

use crate::compose::{ComposeProject, ServiceDescriptor};
use crate::config::ConvertConfig;
use crate::error::Result;
use crate::output::{ManifestWriter, CONTROLLER_SUFFIX, SERVICE_SUFFIX};
use crate::translate::{build_service, short_name, ControllerTranslator};
use serde::Serialize;
use std::path::PathBuf;

/// Converts compose services into manifest files
pub struct Orchestrator {
    translator: ControllerTranslator,
    writer: ManifestWriter,
}

impl Orchestrator {
    /// Create a new orchestrator
    pub fn new(config: &ConvertConfig) -> Self {
        Self {
            translator: ControllerTranslator::new(config),
            writer: ManifestWriter::new(config),
        }
    }

    /// Convert a loaded project
    pub fn run_project(&self, project: &ComposeProject) -> Result<Vec<PathBuf>> {
        let written = self.run(&project.services)?;

        for name in &project.unmatched_rancher {
            tracing::warn!(
                "rancher-compose service {} has no matching compose service",
                name
            );
        }

        Ok(written)
    }

    /// Convert services in order, printing each written path.
    ///
    /// The first failure stops the batch; files already written stay on disk.
    pub fn run(&self, services: &[ServiceDescriptor]) -> Result<Vec<PathBuf>> {
        self.writer.prepare()?;

        let mut written = Vec::with_capacity(services.len() * 2);
        for service in services {
            self.convert(service, &mut written)?;
        }

        tracing::info!(
            "Converted {} services into {}",
            services.len(),
            self.writer.output_dir().display()
        );
        Ok(written)
    }

    /// Convert one service: controller first, then its Service
    fn convert(&self, service: &ServiceDescriptor, written: &mut Vec<PathBuf>) -> Result<()> {
        let short = short_name(&service.name);
        if short != service.name {
            tracing::info!("Service {} truncated to {}", service.name, short);
        }
        tracing::info!("Converting service {}", service.name);

        let rc = self.translator.translate(service, short)?;
        written.push(self.emit(short, CONTROLLER_SUFFIX, &rc)?);

        let srv = build_service(short, service, &rc);
        written.push(self.emit(short, SERVICE_SUFFIX, &srv)?);

        Ok(())
    }

    fn emit<T: Serialize>(&self, short_name: &str, suffix: &str, resource: &T) -> Result<PathBuf> {
        let path = self.writer.write(short_name, suffix, resource)?;
        println!("{}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::ComposeParser;
    use crate::config::OutputFormat;
    use crate::error::KubifyError;
    use crate::kube::{ReplicationController, Service};
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn project(yaml: &str) -> ComposeProject {
        let compose = ComposeParser::parse_str(yaml).unwrap();
        ComposeProject::new(&compose, &Default::default()).unwrap()
    }

    #[test]
    fn test_web_service_to_yaml() {
        let temp = tempdir().unwrap();
        let config = ConvertConfig::new(temp.path()).namespace("prod");
        let project = project(
            r#"
services:
  web:
    image: nginx
    ports:
      - "80:8080"
    restart: always
    labels:
      env: prod
"#,
        );

        let written = Orchestrator::new(&config).run_project(&project).unwrap();
        assert_eq!(
            written,
            vec![temp.path().join("web-rc.yml"), temp.path().join("web-srv.yml")]
        );

        let content = std::fs::read_to_string(&written[0]).unwrap();
        assert!(content.contains("containerPort: 8080"));
        assert!(content.contains("service: web"));
        assert!(content.contains("env: prod"));
        assert!(content.contains("restartPolicy: Always"));
        assert!(content.contains("name: NAMESPACE"));
        assert!(content.contains("value: \"prod\""));

        let rc: ReplicationController = serde_yaml::from_str(&content).unwrap();
        assert_eq!(rc.spec.selector.get("service"), Some(&"web".to_string()));
        assert_eq!(rc.spec.template.spec.containers[0].ports[0].container_port, 8080);

        let srv: Service =
            serde_yaml::from_str(&std::fs::read_to_string(&written[1]).unwrap()).unwrap();
        assert_eq!(srv.spec.ports[0].port, 8080);
        assert_eq!(srv.spec.selector, rc.spec.selector);
    }

    #[test]
    fn test_json_output_and_order() {
        let temp = tempdir().unwrap();
        let config = ConvertConfig::new(temp.path()).format(OutputFormat::Json);
        let project = project(
            r#"
services:
  zeta:
    image: busybox
  a-service-name-longer-than-the-limit:
    image: redis
"#,
        );

        let written = Orchestrator::new(&config).run(&project.services).unwrap();
        let names: Vec<String> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec![
                "zeta-rc.json",
                "zeta-srv.json",
                "a-service-name-longer-th-rc.json",
                "a-service-name-longer-th-srv.json",
            ]
        );

        let rc: ReplicationController =
            serde_json::from_str(&std::fs::read_to_string(&written[2]).unwrap()).unwrap();
        assert_eq!(rc.metadata.name, "a-service-name-longer-th");
    }

    #[test]
    fn test_failure_stops_batch_without_rollback() {
        let temp = tempdir().unwrap();
        let config = ConvertConfig::new(temp.path());
        let project = project(
            r#"
services:
  good:
    image: nginx
  bad:
    image: nginx
    restart: unless-stopped
  never:
    image: nginx
"#,
        );

        let err = Orchestrator::new(&config).run(&project.services).unwrap_err();
        assert!(matches!(err, KubifyError::UnknownRestartPolicy { ref service, .. } if service == "bad"));

        assert!(temp.path().join("good-rc.yml").exists());
        assert!(temp.path().join("good-srv.yml").exists());
        assert!(!temp.path().join("bad-rc.yml").exists());
        assert!(!temp.path().join("never-rc.yml").exists());
    }

    #[test]
    fn test_rancher_metadata_flows_through() {
        let temp = tempdir().unwrap();
        let config = ConvertConfig::new(temp.path()).format(OutputFormat::Json);
        let compose = ComposeParser::parse_str_with_env(
            r#"
services:
  api:
    image: "api:${TAG}"
    ports:
      - "8080"
"#,
            &HashMap::from([("TAG".to_string(), "2.1".to_string())]),
        )
        .unwrap();
        let rancher = ComposeParser::parse_rancher_str(
            r#"
api:
  scale: 3
  health_check:
    port: 8080
    request_line: GET "/ready" "HTTP/1.0"
"#,
        )
        .unwrap();

        let project = ComposeProject::new(&compose, &rancher).unwrap();
        let written = Orchestrator::new(&config).run_project(&project).unwrap();

        let rc: ReplicationController =
            serde_json::from_str(&std::fs::read_to_string(&written[0]).unwrap()).unwrap();
        let container = &rc.spec.template.spec.containers[0];
        assert_eq!(rc.spec.replicas, 3);
        assert_eq!(container.image, "api:2.1");
        assert_eq!(
            container.readiness_probe.as_ref().unwrap().http_get.as_ref().unwrap().path,
            "/ready"
        );
    }
}
