//! Environment mapping

use crate::kube::EnvVar;

/// Name of the variable carrying the target namespace
pub const NAMESPACE_VAR: &str = "NAMESPACE";

/// Map `KEY=VALUE` assignments to container env vars.
///
/// `NAMESPACE` always comes first. Entries without `=` are skipped.
pub fn map_environment(namespace: &str, environment: &[String]) -> Vec<EnvVar> {
    let mut envs = vec![EnvVar::new(NAMESPACE_VAR, namespace)];

    for assignment in environment {
        match assignment.split_once('=') {
            Some((name, value)) => envs.push(EnvVar::new(name, value)),
            None => tracing::debug!("Skipping environment entry without value: {}", assignment),
        }
    }

    envs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_is_first() {
        let envs = map_environment("prod", &[]);
        assert_eq!(envs, vec![EnvVar::new("NAMESPACE", "prod")]);

        let envs = map_environment("prod", &["NAMESPACE=other".to_string()]);
        assert_eq!(envs[0], EnvVar::new("NAMESPACE", "prod"));
        assert_eq!(envs[1], EnvVar::new("NAMESPACE", "other"));
    }

    #[test]
    fn test_split_on_first_equals() {
        let envs = map_environment(
            "default",
            &[
                "URL=postgres://db?sslmode=disable".to_string(),
                "EMPTY=".to_string(),
                "UNSET".to_string(),
                "ENABLED=true".to_string(),
            ],
        );

        assert_eq!(
            envs,
            vec![
                EnvVar::new("NAMESPACE", "default"),
                EnvVar::new("URL", "postgres://db?sslmode=disable"),
                EnvVar::new("EMPTY", ""),
                EnvVar::new("ENABLED", "true"),
            ]
        );
    }
}
