use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Home directory assumed when `HOME` is not set.
pub const DEFAULT_HOME: &str = "/root";

/// `<home>/.kube/config`, unless an explicit path is given.
pub(crate) fn resolve_kubeconfig_path(explicit: Option<&Path>, home: Option<OsString>) -> PathBuf {
    match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let home = home
                .filter(|home| !home.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_HOME));
            home.join(".kube").join("config")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_path_wins() {
        let path = resolve_kubeconfig_path(
            Some(Path::new("/etc/kube/admin.conf")),
            Some(OsString::from("/home/alice")),
        );
        assert_eq!(path, PathBuf::from("/etc/kube/admin.conf"));
    }

    #[test]
    fn test_home_directory() {
        let path = resolve_kubeconfig_path(None, Some(OsString::from("/home/alice")));
        assert_eq!(path, PathBuf::from("/home/alice/.kube/config"));
    }

    #[test]
    fn test_fallback_home() {
        assert_eq!(
            resolve_kubeconfig_path(None, None),
            PathBuf::from("/root/.kube/config")
        );
        assert_eq!(
            resolve_kubeconfig_path(None, Some(OsString::new())),
            PathBuf::from("/root/.kube/config")
        );
    }
}
