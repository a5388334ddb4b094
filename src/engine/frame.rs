//! Line-delimited JSON framing shared by every transport (C1).
//!
//! A frame is one JSON value terminated by `\n`. Readers skip blank lines
//! rather than treating them as malformed, since some clients emit a
//! trailing newline after their last message. The loop is iterative, not
//! recursive, so an arbitrarily long run of empty lines cannot grow the
//! call stack.

use crate::error::EngineError;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Read one frame from `reader`, skipping blank lines and lines that
/// cannot possibly be a JSON object (anything not bracketed by `{`...`}`).
/// Returns `Ok(None)` at clean EOF. The returned string is still raw,
/// unparsed text -- callers pass it to [`parse_frame`] so a frame that
/// looks like an object but contains a JSON syntax error is reported as a
/// proper parse error instead of being silently dropped here.
pub async fn read_line<R>(reader: &mut R) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    loop {
        line.clear();
        let n = reader.read_line(&mut line).await?;
        if n == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']);
        if trimmed.is_empty() {
            continue;
        }
        if !(trimmed.starts_with('{') && trimmed.ends_with('}')) {
            tracing::warn!(frame = %trimmed, "skipping frame that is not a JSON object");
            continue;
        }
        return Ok(Some(trimmed.to_string()));
    }
}

/// Parse a raw line as a JSON-RPC frame. A syntax error is reported as
/// [`EngineError::MalformedFrame`] rather than propagated, since one bad
/// frame must not kill the session.
pub fn parse_frame(line: &str) -> Result<Value, EngineError> {
    serde_json::from_str(line).map_err(|e| EngineError::MalformedFrame(e.to_string()))
}

/// Serialize a value and write it as one newline-terminated frame, flushing
/// immediately so the peer observes it without buffering delay.
pub async fn write_frame<W>(writer: &mut W, value: &Value) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut payload = serde_json::to_vec(value).expect("Value always serializes");
    payload.push(b'\n');
    writer.write_all(&payload).await?;
    writer.flush().await
}
