//! `ping` handler: a liveness probe with a 5 second handler-level timeout
//! enforced by the dispatcher, not here.

use super::EngineContext;
use crate::engine::codec::PingResult;
use crate::error::EngineError;
use serde_json::Value;

pub async fn handle(_ctx: &EngineContext, _params: Option<Value>) -> Result<Value, EngineError> {
    Ok(serde_json::to_value(PingResult {}).expect("PingResult always serializes"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    #[tokio::test]
    async fn test_ping_returns_empty_object() {
        let ctx = EngineContext::new(EngineConfig::default());
        let result = handle(&ctx, None).await.unwrap();
        assert_eq!(result, serde_json::json!({}));
    }
}
