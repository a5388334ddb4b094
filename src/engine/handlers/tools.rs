//! `tools/list` and `tools/call` handlers.

use super::EngineContext;
use crate::engine::codec::{parse_params, ToolCallParams, ToolCallResult, ToolsListParams, ToolsListResult};
use crate::error::EngineError;
use serde_json::Value;

pub async fn list(ctx: &EngineContext, params: Option<Value>) -> Result<Value, EngineError> {
    let _params: ToolsListParams = parse_params(params)?;
    let result = ToolsListResult { tools: ctx.tools.list() };
    Ok(serde_json::to_value(result).expect("ToolsListResult always serializes"))
}

pub async fn call(ctx: &EngineContext, params: Option<Value>) -> Result<Value, EngineError> {
    let params: ToolCallParams = parse_params(params)?;

    let result = match ctx.tools.call(&params.name, params.arguments).await {
        Some(Ok(result)) => result,
        Some(Err(e)) => return Err(e),
        None => ToolCallResult::error(format!("unknown tool: {}", params.name)),
    };

    Ok(serde_json::to_value(result).expect("ToolCallResult always serializes"))
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
    async fn test_list_includes_ping() {
        let result = list(&ctx(), None).await.unwrap();
        let names: Vec<_> = result["tools"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert!(names.contains(&"ping"));
    }

    #[tokio::test]
    async fn test_call_known_tool_succeeds() {
        let params = json!({"name": "ping", "arguments": {"address": "127.0.0.1:1"}});
        let result = call(&ctx(), Some(params)).await.unwrap();
        assert_eq!(result["isError"], false);
    }

    #[tokio::test]
    async fn test_call_unknown_tool_is_successful_error_result() {
        let params = json!({"name": "does_not_exist", "arguments": {}});
        let result = call(&ctx(), Some(params)).await.unwrap();
        assert_eq!(result["isError"], true);
    }

    #[tokio::test]
    async fn test_call_missing_name_is_invalid_params() {
        let err = call(&ctx(), Some(json!({}))).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidParams(_)));
    }
}
