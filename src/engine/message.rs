//! JSON-RPC 2.0 message shapes and the frame classifier (C3).

use crate::engine::id::RequestId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One JSON-RPC error object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;
}

/// A fully formed outbound JSON-RPC response (success or error), ready for
/// the codec to serialize and the writer lane to emit as one frame.
#[derive(Debug, Clone, Serialize)]
pub struct RpcResponse {
    pub jsonrpc: &'static str,
    pub id: RequestId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl RpcResponse {
    pub fn success(id: RequestId, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: RequestId, error: RpcError) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(error),
        }
    }
}

/// An outbound notification (no id, never correlated with a response).
#[derive(Debug, Clone, Serialize)]
pub struct RpcNotification {
    pub jsonrpc: &'static str,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// A classified incoming frame, with the original raw params preserved for
/// the codec/handlers to parse on demand.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifiedMessage {
    Request {
        id: RequestId,
        method: String,
        params: Option<Value>,
    },
    Notification {
        method: String,
        params: Option<Value>,
    },
    Response {
        id: RequestId,
        result: Value,
    },
    ErrorResponse {
        id: RequestId,
        error: RpcError,
    },
    /// Malformed per JSON-RPC 2.0 classification rules. `id` is `Some` only
    /// when an `id` field was syntactically recoverable from the frame.
    Malformed {
        id: Option<RequestId>,
        reason: String,
    },
}

/// Classify a raw JSON value per the strict JSON-RPC 2.0 rules in the
/// protocol design: inspect `jsonrpc`, `method`, `id`, and the mutually
/// exclusive `result`/`error` pair. Field ordering is never trusted.
pub fn classify(value: &Value) -> ClassifiedMessage {
    let obj = match value.as_object() {
        Some(o) => o,
        None => {
            return ClassifiedMessage::Malformed {
                id: None,
                reason: "frame is not a JSON object".to_string(),
            }
        }
    };

    let jsonrpc_ok = obj.get("jsonrpc").and_then(Value::as_str) == Some("2.0");
    let id = parse_id(obj.get("id"));
    let method = obj.get("method").and_then(Value::as_str).map(str::to_string);
    let has_result = obj.contains_key("result");
    let has_error = obj.contains_key("error");

    if !jsonrpc_ok {
        return ClassifiedMessage::Malformed {
            id,
            reason: "missing or invalid \"jsonrpc\" field, expected \"2.0\"".to_string(),
        };
    }

    match (id, method, has_result, has_error) {
        (Some(id), Some(method), false, false) => {
            let params = obj.get("params").cloned();
            ClassifiedMessage::Request { id, method, params }
        }
        (None, Some(method), false, false) => {
            let params = obj.get("params").cloned();
            ClassifiedMessage::Notification { method, params }
        }
        (Some(id), None, true, false) => ClassifiedMessage::Response {
            id,
            result: obj.get("result").cloned().unwrap_or(Value::Null),
        },
        (Some(id), None, false, true) => {
            let error = parse_error_object(obj.get("error"));
            match error {
                Some(error) => ClassifiedMessage::ErrorResponse { id, error },
                None => ClassifiedMessage::Malformed {
                    id: Some(id),
                    reason: "\"error\" field is not a valid RPC error object".to_string(),
                },
            }
        }
        (id, _, _, _) => ClassifiedMessage::Malformed {
            id,
            reason: "frame matches no JSON-RPC 2.0 message shape".to_string(),
        },
    }
}

fn parse_id(value: Option<&Value>) -> Option<RequestId> {
    match value {
        None => None,
        Some(Value::Null) => Some(RequestId::Null),
        Some(Value::String(s)) => Some(RequestId::Str(s.clone())),
        Some(Value::Number(n)) => n.as_i64().map(RequestId::Num),
        Some(_) => None,
    }
}

fn parse_error_object(value: Option<&Value>) -> Option<RpcError> {
    let obj = value?.as_object()?;
    let code = obj.get("code")?.as_i64()?;
    let message = obj.get("message")?.as_str()?.to_string();
    let data = obj.get("data").cloned();
    Some(RpcError { code, message, data })
}
