//! `resources/list`, `resources/templates/list`, and `resources/read`
//! handlers.

use super::EngineContext;
use crate::engine::codec::{
    parse_params, ResourceReadParams, ResourceReadResult, ResourceTemplatesListResult,
    ResourcesListParams, ResourcesListResult,
};
use crate::engine::resources;
use crate::error::EngineError;
use serde_json::Value;

pub async fn list(_ctx: &EngineContext, params: Option<Value>) -> Result<Value, EngineError> {
    let _params: ResourcesListParams = parse_params(params)?;
    let result = ResourcesListResult {
        resources: resources::list(),
    };
    Ok(serde_json::to_value(result).expect("ResourcesListResult always serializes"))
}

pub async fn list_templates(_ctx: &EngineContext, _params: Option<Value>) -> Result<Value, EngineError> {
    let result = ResourceTemplatesListResult {
        resource_templates: resources::list_templates(),
    };
    Ok(serde_json::to_value(result).expect("ResourceTemplatesListResult always serializes"))
}

pub async fn read(ctx: &EngineContext, params: Option<Value>) -> Result<Value, EngineError> {
    let params: ResourceReadParams = parse_params(params)?;
    let contents = resources::read(&params.uri, &ctx.config.project.root_path, &ctx.http_client).await?;
    let result = ResourceReadResult {
        contents: vec![contents],
    };
    Ok(serde_json::to_value(result).expect("ResourceReadResult always serializes"))
}
