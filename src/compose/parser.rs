//! Docker Compose and Rancher Compose file parser

use super::config::{ComposeConfig, RancherComposeConfig};
use super::descriptor::ComposeProject;
use crate::error::{KubifyError, Result};
use regex::{Captures, Regex};
use serde_yaml::{Mapping, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Default compose file names
pub const DEFAULT_COMPOSE_FILES: &[&str] = &[
    "compose.yaml",
    "compose.yml",
    "docker-compose.yaml",
    "docker-compose.yml",
];

/// Default rancher-compose file names
pub const DEFAULT_RANCHER_FILES: &[&str] = &["rancher-compose.yml", "rancher-compose.yaml"];

/// `$$`, `${VAR}`, `${VAR:-default}`, `${VAR-default}` and `$VAR`
static VARIABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\$|\$\{([A-Za-z_][A-Za-z0-9_]*)(?:(:?-)([^}]*))?\}|\$([A-Za-z_][A-Za-z0-9_]*)")
        .expect("variable pattern is valid")
});

/// Compose file parser
pub struct ComposeParser;

impl ComposeParser {
    /// Find compose file in directory
    pub fn find_compose_file(dir: &Path) -> Option<PathBuf> {
        find_first(dir, DEFAULT_COMPOSE_FILES)
    }

    /// Find rancher-compose file in directory
    pub fn find_rancher_file(dir: &Path) -> Option<PathBuf> {
        find_first(dir, DEFAULT_RANCHER_FILES)
    }

    /// Parse compose file from path
    pub fn parse_file(path: &Path, env: &HashMap<String, String>) -> Result<ComposeConfig> {
        let content = read(path)?;
        Self::parse_str_with_env(&content, env)
    }

    /// Parse compose file from string, without interpolation
    ///
    /// Version 1 files, with services at the top level, are accepted too.
    pub fn parse_str(content: &str) -> Result<ComposeConfig> {
        let value: Value = serde_yaml::from_str(content)
            .map_err(|e| KubifyError::ComposeParse(format!("Failed to parse YAML: {}", e)))?;

        serde_yaml::from_value(nest_services(value))
            .map_err(|e| KubifyError::ComposeParse(format!("Invalid compose file: {}", e)))
    }

    /// Parse compose file from string, interpolating variables from `env`
    pub fn parse_str_with_env(content: &str, env: &HashMap<String, String>) -> Result<ComposeConfig> {
        let mut value: Value = serde_yaml::from_str(content)
            .map_err(|e| KubifyError::ComposeParse(format!("Failed to parse YAML: {}", e)))?;
        interpolate(&mut value, env);

        serde_yaml::from_value(nest_services(value))
            .map_err(|e| KubifyError::ComposeParse(format!("Invalid compose file: {}", e)))
    }

    /// Parse rancher-compose file from path
    pub fn parse_rancher_file(path: &Path) -> Result<RancherComposeConfig> {
        let content = read(path)?;
        Self::parse_rancher_str(&content)
    }

    /// Parse rancher-compose file from string
    ///
    /// Both layouts are accepted: services at the top level (v1) and services
    /// nested under `services:` (v2).
    pub fn parse_rancher_str(content: &str) -> Result<RancherComposeConfig> {
        let value: Value = serde_yaml::from_str(content).map_err(|e| {
            KubifyError::ComposeParse(format!("Failed to parse rancher-compose YAML: {}", e))
        })?;

        serde_yaml::from_value(nest_services(value)).map_err(|e| {
            KubifyError::ComposeParse(format!("Invalid rancher-compose file: {}", e))
        })
    }

    /// Load a compose project, with its optional rancher-compose file
    pub fn load_project(
        compose_file: &Path,
        rancher_file: Option<&Path>,
        env: &HashMap<String, String>,
    ) -> Result<ComposeProject> {
        let compose = Self::parse_file(compose_file, env)?;
        Self::validate(&compose)?;

        let rancher = match rancher_file {
            Some(path) => {
                tracing::debug!("Reading rancher-compose metadata from {}", path.display());
                Self::parse_rancher_file(path)?
            }
            None => RancherComposeConfig::default(),
        };

        ComposeProject::new(&compose, &rancher)
    }

    /// Validate compose configuration
    pub fn validate(config: &ComposeConfig) -> Result<()> {
        if config.services.is_empty() {
            return Err(KubifyError::NoServices);
        }

        for (name, service) in config.services.iter() {
            if service.image.is_none() && service.build.is_none() {
                return Err(KubifyError::ComposeParse(format!(
                    "Service '{}' must have either 'image' or 'build' specified",
                    name
                )));
            }
        }

        Ok(())
    }
}

fn find_first(dir: &Path, names: &[&str]) -> Option<PathBuf> {
    names.iter().map(|name| dir.join(name)).find(|path| path.exists())
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        KubifyError::ComposeParse(format!("Failed to read {}: {}", path.display(), e))
    })
}

/// Interpolate variables in every string of a YAML document
fn interpolate(value: &mut Value, env: &HashMap<String, String>) {
    match value {
        Value::String(s) => {
            if s.contains('$') {
                *s = interpolate_string(s, env);
            }
        }
        Value::Sequence(seq) => {
            for item in seq.iter_mut() {
                interpolate(item, env);
            }
        }
        Value::Mapping(mapping) => {
            for (_, item) in mapping.iter_mut() {
                interpolate(item, env);
            }
        }
        Value::Tagged(tagged) => interpolate(&mut tagged.value, env),
        Value::Null | Value::Bool(_) | Value::Number(_) => {}
    }
}

/// Interpolate environment variables in a string
fn interpolate_string(s: &str, env: &HashMap<String, String>) -> String {
    VARIABLE
        .replace_all(s, |caps: &Captures| {
            if &caps[0] == "$$" {
                return "$".to_string();
            }

            let (var, operator, default) = match caps.get(4) {
                Some(bare) => (bare.as_str(), None, ""),
                None => (
                    caps.get(1).map_or("", |m| m.as_str()),
                    caps.get(2).map(|m| m.as_str()),
                    caps.get(3).map_or("", |m| m.as_str()),
                ),
            };

            match (env.get(var), operator) {
                (Some(v), Some(":-")) if v.is_empty() => default.to_string(),
                (Some(v), _) => v.clone(),
                (None, Some(_)) => default.to_string(),
                (None, None) => {
                    tracing::warn!("Variable {} is not set, defaulting to a blank string", var);
                    String::new()
                }
            }
        })
        .into_owned()
}

/// Move top-level services (version 1 layout) under a `services` key
fn nest_services(value: Value) -> Value {
    let value = if value.is_null() {
        Value::Mapping(Mapping::new())
    } else {
        value
    };
    match value {
        Value::Mapping(mut services) if !services.contains_key("services") => {
            let mut document = Mapping::new();
            if let Some(version) = services.remove("version") {
                document.insert(Value::from("version"), version);
            }
            document.insert(Value::from("services"), Value::Mapping(services));
            Value::Mapping(document)
        }
        other => other,
    }
}
