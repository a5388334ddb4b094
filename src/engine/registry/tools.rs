//! Tool registry (C11): the immutable set of tools the engine exposes.
//!
//! Ships two reference tools, `ping` and `fetch`, so `tools/list` and
//! `tools/call` are exercised end-to-end without depending on any
//! deployment-specific tool set.

use crate::engine::codec::{ResourceContents, ToolCallResult, ToolDescriptor, ToolResponseContent};
use crate::error::EngineError;
use base64::Engine as _;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;

/// One registered tool: its descriptor plus the closure that executes it.
pub struct ToolEntry {
    pub descriptor: ToolDescriptor,
    handler: Box<dyn Fn(Value) -> BoxedFuture + Send + Sync>,
}

type BoxedFuture =
    std::pin::Pin<Box<dyn std::future::Future<Output = Result<ToolCallResult, EngineError>> + Send>>;

/// Immutable registry of tools, built once at startup.
pub struct ToolRegistry {
    tools: HashMap<String, ToolEntry>,
}

impl ToolRegistry {
    /// Build the registry with the built-in reference tools.
    pub fn with_reference_tools(http_client: reqwest::Client) -> Self {
        let mut tools = HashMap::new();

        tools.insert(
            "ping".to_string(),
            ToolEntry {
                descriptor: ToolDescriptor {
                    name: "ping".to_string(),
                    description: "Probes reachability of a host with a TCP connect and a 5 second timeout."
                        .to_string(),
                    input_schema: json!({
                        "type": "object",
                        "properties": {
                            "address": {"type": "string"}
                        },
                        "required": ["address"],
                        "additionalProperties": false
                    }),
                },
                handler: Box::new(|args| Box::pin(async move { ping_tool(args).await })),
            },
        );

        tools.insert(
            "fetch".to_string(),
            ToolEntry {
                descriptor: ToolDescriptor {
                    name: "fetch".to_string(),
                    description: "Fetches a URL over HTTP(S) with a 30 second timeout."
                        .to_string(),
                    input_schema: json!({
                        "type": "object",
                        "properties": {
                            "url": {"type": "string"}
                        },
                        "required": ["url"],
                        "additionalProperties": false
                    }),
                },
                handler: Box::new(move |args| {
                    let client = http_client.clone();
                    Box::pin(async move { fetch_tool(client, args).await })
                }),
            },
        );

        Self { tools }
    }

    pub fn list(&self) -> Vec<ToolDescriptor> {
        let mut descriptors: Vec<_> = self.tools.values().map(|t| t.descriptor.clone()).collect();
        descriptors.sort_by(|a, b| a.name.cmp(&b.name));
        descriptors
    }

    /// Invoke a tool by name. `None` means the name is unknown -- callers
    /// turn that into a successful `isError=true` result rather than a
    /// protocol-level MethodNotFound, since the method (`tools/call`) is
    /// valid even if the argument isn't.
    pub async fn call(&self, name: &str, arguments: Value) -> Option<Result<ToolCallResult, EngineError>> {
        let entry = self.tools.get(name)?;
        Some((entry.handler)(arguments).await)
    }
}

async fn fetch_tool(client: reqwest::Client, args: Value) -> Result<ToolCallResult, EngineError> {
    let url = args
        .get("url")
        .and_then(Value::as_str)
        .ok_or_else(|| EngineError::InvalidParams("fetch requires a \"url\" string".to_string()))?;

    let response = client.get(url).timeout(Duration::from_secs(30)).send().await;

    let resp = match response {
        Ok(resp) if resp.status().is_success() => resp,
        Ok(resp) => {
            return Ok(ToolCallResult::error(format!(
                "upstream returned status {}",
                resp.status()
            )))
        }
        Err(e) => return Ok(ToolCallResult::error(format!("request failed: {e}"))),
    };

    let mime_type = resp
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();

    let bytes = match resp.bytes().await {
        Ok(bytes) => bytes,
        Err(e) => return Ok(ToolCallResult::error(format!("failed to read response body: {e}"))),
    };

    // Mirrors the resources/read text-vs-blob discrimination rule so fetch
    // results and resource reads behave the same way for the same bytes.
    let resource = if mime_type.starts_with("text/") || mime_type == "application/json" || mime_type.is_empty() {
        match String::from_utf8(bytes.to_vec()) {
            Ok(text) => ResourceContents::Text {
                uri: url.to_string(),
                mime_type,
                text,
            },
            Err(_) => ResourceContents::Blob {
                uri: url.to_string(),
                mime_type,
                blob: base64::engine::general_purpose::STANDARD.encode(&bytes),
            },
        }
    } else {
        ResourceContents::Blob {
            uri: url.to_string(),
            mime_type,
            blob: base64::engine::general_purpose::STANDARD.encode(&bytes),
        }
    };

    Ok(ToolCallResult {
        content: vec![ToolResponseContent::Resource { resource }],
        is_error: false,
    })
}

const PING_TIMEOUT: Duration = Duration::from_secs(5);

/// Probes `address` with a TCP connect attempt. A refused connection still
/// counts as reachable -- it means a host answered, just not on that port --
/// whereas a timeout means nothing answered at all.
async fn ping_tool(args: Value) -> Result<ToolCallResult, EngineError> {
    let address = args
        .get("address")
        .and_then(Value::as_str)
        .ok_or_else(|| EngineError::InvalidParams("ping requires an \"address\" string".to_string()))?;

    let target = if address.contains(':') {
        address.to_string()
    } else {
        format!("{address}:7")
    };

    match tokio::time::timeout(PING_TIMEOUT, tokio::net::TcpStream::connect(&target)).await {
        Ok(Ok(_)) => Ok(ToolCallResult::text(format!("{address} is reachable"))),
        Ok(Err(e)) if e.kind() == std::io::ErrorKind::ConnectionRefused => Ok(ToolCallResult::text(
            format!("{address} is reachable (connection refused)"),
        )),
        Ok(Err(e)) => Ok(ToolCallResult::error(format!("{address} unreachable: {e}"))),
        Err(_) => Ok(ToolCallResult::error(format!(
            "{address} timed out after {}s",
            PING_TIMEOUT.as_secs()
        ))),
    }
}
