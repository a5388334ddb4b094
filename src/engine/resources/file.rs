//! `file://` resource resolution, sandboxed to the configured project root.

use crate::error::EngineError;
use std::path::{Path, PathBuf};

/// Resolve a `file://` URI against `project_root`, rejecting any path whose
/// canonical form escapes the root.
pub async fn resolve(uri: &str, project_root: &Path) -> Result<(String, Vec<u8>), EngineError> {
    let relative = uri
        .strip_prefix("file://")
        .ok_or_else(|| EngineError::InvalidParams(format!("not a file:// URI: {uri}")))?;

    let candidate = project_root.join(relative.trim_start_matches('/'));

    let canonical_root = tokio::fs::canonicalize(project_root)
        .await
        .map_err(|e| EngineError::Internal(format!("failed to canonicalize project root: {e}")))?;

    let canonical_candidate = tokio::fs::canonicalize(&candidate).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            EngineError::ResourceNotFound(uri.to_string())
        } else {
            EngineError::Internal(format!("failed to canonicalize {}: {e}", candidate.display()))
        }
    })?;

    if !canonical_candidate.starts_with(&canonical_root) {
        return Err(EngineError::PermissionDenied(format!(
            "{uri} resolves outside the project root"
        )));
    }

    let bytes = tokio::fs::read(&canonical_candidate)
        .await
        .map_err(|e| EngineError::Internal(format!("failed to read {}: {e}", canonical_candidate.display())))?;

    let mime_type = mime_guess_from_path(&canonical_candidate);
    Ok((mime_type, bytes))
}

fn mime_guess_from_path(path: &PathBuf) -> String {
    match path.extension().and_then(|e| e.to_str()) {
        Some("txt") | Some("md") => "text/plain".to_string(),
        Some("json") => "application/json".to_string(),
        Some("yaml") | Some("yml") => "application/yaml".to_string(),
        Some("html") => "text/html".to_string(),
        _ => "application/octet-stream".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_resolves_file_within_root() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("hello.txt");
        std::fs::File::create(&file_path)
            .unwrap()
            .write_all(b"hi")
            .unwrap();

        let (mime, bytes) = resolve("file:///hello.txt", dir.path()).await.unwrap();
        assert_eq!(mime, "text/plain");
        assert_eq!(bytes, b"hi");
    }

    #[tokio::test]
    async fn test_rejects_path_escaping_root() {
        // An absolute path can never escape this sandbox -- it gets joined
        // as a relative path under root and simply fails to exist. The real
        // escape shape is `..`: a sibling file that exists outside root,
        // reached by walking back up out of it, so canonicalization lands
        // on a real path the `starts_with` check then rejects.
        let parent = tempfile::tempdir().unwrap();
        let root = parent.path().join("root");
        std::fs::create_dir(&root).unwrap();
        let secret_path = parent.path().join("secret.txt");
        std::fs::File::create(&secret_path)
            .unwrap()
            .write_all(b"top secret")
            .unwrap();

        let err = resolve("file:///../secret.txt", &root).await.unwrap_err();
        assert!(matches!(err, EngineError::PermissionDenied(_)));
    }

    #[tokio::test]
    async fn test_missing_file_returns_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve("file:///nope.txt", dir.path()).await.unwrap_err();
        assert!(matches!(err, EngineError::ResourceNotFound(_)));
    }

    #[tokio::test]
    async fn test_rejects_non_file_scheme() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve("http://example.com", dir.path()).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidParams(_)));
    }
}
