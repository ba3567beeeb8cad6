//! Readiness probe from the rancher-compose health check

use crate::compose::ServiceDescriptor;
use crate::error::{KubifyError, Result};
use crate::kube::{HttpGetAction, Probe, TcpSocketAction};

/// Build the readiness probe, if the service declares a health check.
///
/// A `request_line` selects an HTTP GET probe on its path; otherwise the
/// port is probed over TCP.
pub fn readiness_probe(service: &ServiceDescriptor) -> Result<Option<Probe>> {
    let Some(check) = service.rancher.as_ref().and_then(|r| r.health_check.as_ref()) else {
        return Ok(None);
    };

    let invalid = |message: &str| KubifyError::InvalidHealthCheck {
        service: service.name.clone(),
        message: message.to_string(),
    };

    let port = check.port.ok_or_else(|| invalid("missing port"))?;

    let mut probe = Probe {
        initial_delay_seconds: check.initializing_timeout.map(millis_to_seconds),
        timeout_seconds: check.response_timeout.map(millis_to_seconds),
        period_seconds: check.interval.map(millis_to_seconds),
        success_threshold: check.healthy_threshold,
        failure_threshold: check.unhealthy_threshold,
        ..Default::default()
    };

    match check.request_line.as_deref() {
        Some(line) => {
            let path = request_path(line)
                .ok_or_else(|| invalid(&format!("cannot find a path in request line {}", line)))?;
            probe.http_get = Some(HttpGetAction { path, port });
        }
        None => probe.tcp_socket = Some(TcpSocketAction { port }),
    }

    if let Some(strategy) = &check.strategy {
        tracing::debug!("Ignoring health check strategy {} of service {}", strategy, service.name);
    }
    Ok(Some(probe))
}

/// Path from a request line such as `GET "/healthcheck" "HTTP/1.0"`
fn request_path(line: &str) -> Option<String> {
    line.split_whitespace()
        .nth(1)
        .map(|path| path.trim_matches('"'))
        .filter(|path| !path.is_empty())
        .map(str::to_string)
}

/// Whole seconds, never below one
fn millis_to_seconds(millis: u64) -> i32 {
    i32::try_from(millis / 1000).unwrap_or(i32::MAX).max(1)
}
