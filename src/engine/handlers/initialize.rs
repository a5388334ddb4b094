//! `initialize` handler.

use super::EngineContext;
use crate::engine::codec::{
    parse_params, InitializeParams, InitializeResult, PromptsCapability, ResourcesCapability,
    ServerCapabilities, ServerInfo, ToolsCapability,
};
use crate::error::EngineError;
use serde_json::Value;

/// Protocol version this engine speaks. Negotiation is not attempted
/// beyond echoing it back; a future version bump belongs here.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

pub async fn handle(ctx: &EngineContext, params: Option<Value>) -> Result<Value, EngineError> {
    let params: InitializeParams = parse_params(params)?;
    let _ = &ctx.config;

    if params.protocol_version != PROTOCOL_VERSION {
        tracing::warn!(
            requested = %params.protocol_version,
            served = PROTOCOL_VERSION,
            "client requested a different protocol version; responding with the server's own (lenient negotiation)"
        );
    }

    let result = InitializeResult {
        protocol_version: PROTOCOL_VERSION.to_string(),
        capabilities: ServerCapabilities {
            tools: ToolsCapability { list_changed: false },
            prompts: PromptsCapability { list_changed: false },
            resources: ResourcesCapability {
                list_changed: false,
                subscribe: false,
            },
        },
        server_info: ServerInfo {
            name: "mcp-engine".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
    };

    Ok(serde_json::to_value(result).expect("InitializeResult always serializes"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use serde_json::json;

    fn ctx() -> EngineContext {
        EngineContext::new(EngineConfig::default())
    }

    #[tokio::test]
    async fn test_initialize_echoes_protocol_version() {
        let params = json!({
            "protocolVersion": "2024-11-05",
            "clientInfo": {"name": "test-client", "version": "0.1"}
        });
        let result = handle(&ctx(), Some(params)).await.unwrap();
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], "mcp-engine");
    }

    #[tokio::test]
    async fn test_initialize_rejects_missing_client_info() {
        let params = json!({"protocolVersion": "2024-11-05"});
        let err = handle(&ctx(), Some(params)).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidParams(_)));
    }

    #[tokio::test]
    async fn test_initialize_tolerates_mismatched_protocol_version() {
        let params = json!({
            "protocolVersion": "2023-01-01",
            "clientInfo": {"name": "old-client", "version": "0.1"}
        });
        let result = handle(&ctx(), Some(params)).await.unwrap();
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
    }
}
