//! Volume mapping: compose bind mounts become hostPath volumes

use crate::error::{KubifyError, Result};
use crate::kube::{HostPathVolumeSource, Volume, VolumeMount};

/// Map `host:container[:mode]` specs to mounts and their backing volumes.
///
/// The volume name is the host path with every `/` removed, so host paths
/// differing only by separators share a name.
pub fn map_volumes(service: &str, volumes: &[String]) -> Result<(Vec<VolumeMount>, Vec<Volume>)> {
    let mut mounts = Vec::with_capacity(volumes.len());
    let mut host_volumes = Vec::with_capacity(volumes.len());

    for spec in volumes {
        let parts: Vec<&str> = spec.split(':').collect();
        let [host_path, container_path, options @ ..] = parts.as_slice() else {
            return Err(KubifyError::InvalidVolume {
                service: service.to_string(),
                spec: spec.clone(),
            });
        };

        let mut read_only = false;
        for option in options {
            match *option {
                "ro" => read_only = true,
                "rw" => read_only = false,
                _ => {}
            }
        }

        let name = host_path.replace('/', "");
        tracing::debug!("Mounting {} at {} as {}", host_path, container_path, name);

        mounts.push(VolumeMount {
            name: name.clone(),
            read_only,
            mount_path: container_path.to_string(),
        });
        host_volumes.push(Volume {
            name,
            host_path: Some(HostPathVolumeSource {
                path: host_path.to_string(),
            }),
        });
    }

    Ok((mounts, host_volumes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_read_write() {
        let (mounts, volumes) = map_volumes("web", &["/host:/container".to_string()]).unwrap();

        assert_eq!(mounts.len(), 1);
        assert_eq!(mounts[0].name, "host");
        assert_eq!(mounts[0].mount_path, "/container");
        assert!(!mounts[0].read_only);
        assert_eq!(volumes[0].name, "host");
        assert_eq!(volumes[0].host_path.as_ref().unwrap().path, "/host");
    }

    #[test]
    fn test_read_only() {
        let (mounts, _) = map_volumes("web", &["/host:/container:ro".to_string()]).unwrap();
        assert!(mounts[0].read_only);

        let (mounts, _) = map_volumes("web", &["/host:/container:ro,z:rw".to_string()]).unwrap();
        assert!(!mounts[0].read_only);
    }

    #[test]
    fn test_name_strips_separators() {
        let (mounts, volumes) =
            map_volumes("web", &["/var/lib/data:/data".to_string()]).unwrap();
        assert_eq!(mounts[0].name, "varlibdata");
        assert_eq!(volumes[0].name, "varlibdata");
    }

    #[test]
    fn test_missing_host_path_fails() {
        let err = map_volumes("web", &["/nouser".to_string()]).unwrap_err();
        assert!(matches!(err, KubifyError::InvalidVolume { ref spec, .. } if spec == "/nouser"));
    }
}
