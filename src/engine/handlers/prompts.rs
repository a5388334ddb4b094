//! `prompts/list` and `prompts/get` handlers.

use super::EngineContext;
use crate::engine::codec::{parse_params, PromptGetParams, PromptsListParams, PromptsListResult};
use crate::error::EngineError;
use serde_json::Value;

pub async fn list(ctx: &EngineContext, params: Option<Value>) -> Result<Value, EngineError> {
    let _params: PromptsListParams = parse_params(params)?;
    let result = PromptsListResult { prompts: ctx.prompts.list() };
    Ok(serde_json::to_value(result).expect("PromptsListResult always serializes"))
}

pub async fn get(ctx: &EngineContext, params: Option<Value>) -> Result<Value, EngineError> {
    let params: PromptGetParams = parse_params(params)?;

    let result = match ctx.prompts.get(&params.name, &params.arguments) {
        Some(Ok(result)) => result,
        Some(Err(e)) => return Err(e),
        None => {
            return Err(EngineError::MethodNotFound(format!(
                "unknown prompt: {}",
                params.name
            )))
        }
    };

    Ok(serde_json::to_value(result).expect("PromptGetResult always serializes"))
}
