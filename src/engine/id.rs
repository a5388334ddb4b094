//! JSON-RPC request identifiers.
//!
//! `id` is a scalar that is either a string, a non-null number, or absent
//! (notifications). We model it as a tagged enum rather than a bare
//! `serde_json::Value` so the string/number distinction survives a
//! serde round-trip exactly -- `1` and `"1"` must never compare equal.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A JSON-RPC request identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    /// A string identifier.
    Str(String),
    /// A numeric identifier. JSON-RPC permits any number; the engine only
    /// accepts integers, matching every MCP client observed in practice.
    Num(i64),
    /// `null`, used for error responses whose originating id could not be
    /// recovered from a malformed frame.
    Null,
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestId::Str(s) => write!(f, "{s}"),
            RequestId::Num(n) => write!(f, "{n}"),
            RequestId::Null => write!(f, "null"),
        }
    }
}

impl From<i64> for RequestId {
    fn from(n: i64) -> Self {
        RequestId::Num(n)
    }
}

impl From<String> for RequestId {
    fn from(s: String) -> Self {
        RequestId::Str(s)
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        RequestId::Str(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_and_number_ids_are_not_equal() {
        let a = RequestId::Str("1".to_string());
        let b = RequestId::Num(1);
        assert_ne!(a, b);
    }

    #[test]
    fn test_round_trip_preserves_string_type() {
        let id = RequestId::Str("abc".to_string());
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"abc\"");
        let back: RequestId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_round_trip_preserves_number_type() {
        let id = RequestId::Num(42);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "42");
        let back: RequestId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_null_round_trip() {
        let id = RequestId::Null;
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "null");
        let back: RequestId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_display() {
        assert_eq!(RequestId::Str("x".into()).to_string(), "x");
        assert_eq!(RequestId::Num(7).to_string(), "7");
        assert_eq!(RequestId::Null.to_string(), "null");
    }
}
