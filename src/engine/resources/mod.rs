//! Resource resolution (C8): three schemes, one dispatch point.

pub mod data;
pub mod file;
pub mod http;

use crate::engine::codec::{ResourceContents, ResourceDescriptor, ResourceTemplate};
use crate::error::EngineError;
use base64::Engine;
use std::path::Path;

/// Resolve a `uri` against the scheme-appropriate resolver and wrap the
/// result as the tagged `ResourceContents` the wire format expects.
/// `text/*`, `application/json`, and empty mime types are returned as
/// `text`; everything else as base64 `blob`.
pub async fn read(
    uri: &str,
    project_root: &Path,
    http_client: &reqwest::Client,
) -> Result<ResourceContents, EngineError> {
    let (mime_type, bytes) = if uri.starts_with("file://") {
        file::resolve(uri, project_root).await?
    } else if uri.starts_with("http://") || uri.starts_with("https://") {
        http::resolve(http_client, uri).await?
    } else if uri.starts_with("data://random_data") {
        data::resolve(uri)?
    } else {
        return Err(EngineError::InvalidParams(format!(
            "unsupported resource scheme: {uri}"
        )));
    };

    if mime_type.starts_with("text/") || mime_type == "application/json" || mime_type.is_empty() {
        let text = String::from_utf8(bytes).map_err(|e| {
            EngineError::Internal(format!("resource {uri} is not valid UTF-8: {e}"))
        })?;
        Ok(ResourceContents::Text {
            uri: uri.to_string(),
            mime_type,
            text,
        })
    } else {
        let blob = base64::engine::general_purpose::STANDARD.encode(bytes);
        Ok(ResourceContents::Blob {
            uri: uri.to_string(),
            mime_type,
            blob,
        })
    }
}

/// Static catalog surfaced by `resources/list`. The engine does not walk
/// the project tree; it advertises the data resource and lets clients
/// discover `file://`/`http(s)://` targets out of band via templates.
pub fn list() -> Vec<ResourceDescriptor> {
    vec![ResourceDescriptor {
        uri: "data://random_data?length=32".to_string(),
        name: "random_data".to_string(),
        mime_type: "text/plain".to_string(),
    }]
}

/// Static catalog surfaced by `resources/templates/list`.
pub fn list_templates() -> Vec<ResourceTemplate> {
    vec![
        ResourceTemplate {
            uri_template: "file://{path}".to_string(),
            name: "project_file".to_string(),
            description: "A file within the configured project root".to_string(),
        },
        ResourceTemplate {
            uri_template: "{scheme}://{host}{path}".to_string(),
            name: "http_resource".to_string(),
            description: "An HTTP or HTTPS resource fetched with a 30s timeout".to_string(),
        },
        ResourceTemplate {
            uri_template: "data://random_data?length={length}".to_string(),
            name: "random_data".to_string(),
            description: "Randomly generated alphanumeric data, 1-1024 bytes".to_string(),
        },
    ]
}
