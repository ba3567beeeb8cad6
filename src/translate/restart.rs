//! Restart policy mapping

use crate::error::{KubifyError, Result};
use crate::kube::RestartPolicy;

/// Map a compose restart policy to the pod restart policy
pub fn map_restart_policy(service: &str, restart: &str) -> Result<RestartPolicy> {
    match restart {
        "" | "always" => Ok(RestartPolicy::Always),
        "no" => Ok(RestartPolicy::Never),
        "on-failure" => Ok(RestartPolicy::OnFailure),
        other => Err(KubifyError::UnknownRestartPolicy {
            service: service.to_string(),
            policy: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_policies() {
        assert_eq!(map_restart_policy("web", "").unwrap(), RestartPolicy::Always);
        assert_eq!(map_restart_policy("web", "always").unwrap(), RestartPolicy::Always);
        assert_eq!(map_restart_policy("web", "no").unwrap(), RestartPolicy::Never);
        assert_eq!(map_restart_policy("web", "on-failure").unwrap(), RestartPolicy::OnFailure);
    }

    #[test]
    fn test_unknown_policy_names_service() {
        let err = map_restart_policy("worker", "unless-stopped").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unknown restart policy unless-stopped for service worker"
        );
    }
}
