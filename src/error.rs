//! Error types for the MCP engine
//!
//! This module defines all error types used throughout the engine, using
//! `thiserror` for ergonomic error handling. [`EngineError`] variants map
//! deterministically onto JSON-RPC error codes via [`EngineError::rpc_code`].

use thiserror::Error;

/// Main error type for MCP engine operations.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration-related errors (missing/invalid config values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Transport I/O failure (outbound write, listener bind, etc).
    #[error("transport error: {0}")]
    Transport(String),

    /// A frame could not be parsed as JSON at all.
    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    /// A frame parsed as JSON but did not conform to JSON-RPC 2.0.
    #[error("invalid JSON-RPC request: {0}")]
    InvalidRequest(String),

    /// The requested method has no registered handler.
    #[error("method not found: {0}")]
    MethodNotFound(String),

    /// Required parameters were absent or malformed.
    #[error("invalid params: {0}")]
    InvalidParams(String),

    /// A handler failed unexpectedly while processing an otherwise valid request.
    #[error("internal error: {0}")]
    Internal(String),

    /// `resources/read` resolved a URI whose canonical path escaped the
    /// configured project root.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// `resources/read` target does not exist.
    #[error("resource not found: {0}")]
    ResourceNotFound(String),

    /// An upstream HTTP fetch (resource or fetch tool) failed.
    #[error("upstream HTTP error: {0}")]
    UpstreamHttp(String),

    /// Generic IO failure (file read, socket bind, etc).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML configuration parsing errors.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP client errors surfaced from `reqwest`.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl EngineError {
    /// Maps this error onto one of the reserved JSON-RPC 2.0 error codes.
    ///
    /// Tool-level failures (represented via `CallToolResult.isError`) never
    /// reach this path; only protocol-level failures do.
    pub fn rpc_code(&self) -> i64 {
        match self {
            EngineError::MalformedFrame(_) | EngineError::Serialization(_) => -32700,
            EngineError::InvalidRequest(_) => -32600,
            EngineError::MethodNotFound(_) => -32601,
            EngineError::InvalidParams(_)
            | EngineError::PermissionDenied(_)
            | EngineError::ResourceNotFound(_) => -32602,
            EngineError::Config(_)
            | EngineError::Transport(_)
            | EngineError::Internal(_)
            | EngineError::UpstreamHttp(_)
            | EngineError::Io(_)
            | EngineError::Yaml(_)
            | EngineError::Http(_) => -32603,
        }
    }
}

/// Result type alias for engine operations that need rich error context
/// rather than a typed `EngineError` (process-level `main`, config loading).
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_frame_maps_to_parse_error() {
        let err = EngineError::MalformedFrame("unexpected eof".to_string());
        assert_eq!(err.rpc_code(), -32700);
    }

    #[test]
    fn test_invalid_request_maps_to_invalid_request_code() {
        let err = EngineError::InvalidRequest("missing jsonrpc field".to_string());
        assert_eq!(err.rpc_code(), -32600);
    }

    #[test]
    fn test_method_not_found_maps_to_method_not_found_code() {
        let err = EngineError::MethodNotFound("frobnicate".to_string());
        assert_eq!(err.rpc_code(), -32601);
    }

    #[test]
    fn test_invalid_params_maps_to_invalid_params_code() {
        let err = EngineError::InvalidParams("uri missing".to_string());
        assert_eq!(err.rpc_code(), -32602);
    }

    #[test]
    fn test_permission_denied_maps_to_invalid_params_code() {
        let err = EngineError::PermissionDenied("escapes project root".to_string());
        assert_eq!(err.rpc_code(), -32602);
    }

    #[test]
    fn test_internal_maps_to_internal_error_code() {
        let err = EngineError::Internal("handler panicked".to_string());
        assert_eq!(err.rpc_code(), -32603);
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            EngineError::Config("bad root".into()).to_string(),
            "configuration error: bad root"
        );
        assert_eq!(
            EngineError::ResourceNotFound("file.txt".into()).to_string(),
            "resource not found: file.txt"
        );
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EngineError>();
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: EngineError = io_error.into();
        assert!(matches!(err, EngineError::Io(_)));
        assert_eq!(err.rpc_code(), -32603);
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{bad}").unwrap_err();
        let err: EngineError = json_err.into();
        assert!(matches!(err, EngineError::Serialization(_)));
        assert_eq!(err.rpc_code(), -32700);
    }
}
