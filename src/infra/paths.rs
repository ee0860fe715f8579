// ============================================================
// Layer 6 — Deployment Root Paths
// ============================================================
// Artifact and dataset paths are given relative to a deployment
// root (the `--root` flag / FACEMESH_ROOT). Absolute paths are
// taken as-is, so an operator can still point at a mounted
// volume elsewhere.

use std::path::{Path, PathBuf};

/// Resolve `path` against `root` unless it is already absolute.
pub fn resolve(root: impl AsRef<Path>, path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.as_ref().join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_joins_root() {
        assert_eq!(
            resolve("/srv/facemesh", "checkpoints"),
            PathBuf::from("/srv/facemesh/checkpoints")
        );
    }

    #[test]
    fn test_absolute_is_kept() {
        assert_eq!(resolve("/srv/facemesh", "/data/ckpt"), PathBuf::from("/data/ckpt"));
    }

    #[test]
    fn test_dot_root_keeps_relative_path() {
        assert_eq!(resolve(".", "data/train.csv"), PathBuf::from("./data/train.csv"));
    }
}
