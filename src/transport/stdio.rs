//! Stdio transport: the engine's own stdin/stdout, newline-delimited JSON.
//!
//! Unlike the teacher's client-side stdio transport (which spawns a child
//! process and speaks to *its* stdin/stdout), this engine is the server:
//! it reads requests from its own stdin and writes responses to its own
//! stdout. stderr is left free for logging.

use super::{FrameReader, FrameWriter, Transport};
use crate::engine::frame;
use crate::error::EngineError;
use async_trait::async_trait;
use tokio::io::{BufReader, Stdin, Stdout};

pub struct StdioTransport {
    stdin: Stdin,
    stdout: Stdout,
}

impl StdioTransport {
    pub fn new() -> Self {
        Self {
            stdin: tokio::io::stdin(),
            stdout: tokio::io::stdout(),
        }
    }
}

impl Default for StdioTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for StdioTransport {
    fn split(self: Box<Self>) -> (Box<dyn FrameReader>, Box<dyn FrameWriter>) {
        let reader = StdioReader {
            inner: BufReader::new(self.stdin),
        };
        let writer = StdioWriter { inner: self.stdout };
        (Box::new(reader), Box::new(writer))
    }
}

struct StdioReader {
    inner: BufReader<Stdin>,
}

#[async_trait]
impl FrameReader for StdioReader {
    async fn read_frame(&mut self) -> Result<Option<String>, EngineError> {
        frame::read_line(&mut self.inner)
            .await
            .map_err(|e| EngineError::Transport(format!("stdin read failed: {e}")))
    }
}

struct StdioWriter {
    inner: Stdout,
}

#[async_trait]
impl FrameWriter for StdioWriter {
    async fn write_frame(&mut self, value: &serde_json::Value) -> Result<(), EngineError> {
        frame::write_frame(&mut self.inner, value)
            .await
            .map_err(|e| EngineError::Transport(format!("stdout write failed: {e}")))
    }

    async fn shutdown(&mut self) -> Result<(), EngineError> {
        use tokio::io::AsyncWriteExt;
        self.inner
            .flush()
            .await
            .map_err(|e| EngineError::Transport(format!("stdout flush failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::frame as frame_mod;
    use serde_json::json;
    use tokio::io::BufReader as TokioBufReader;

    struct VecReader {
        inner: TokioBufReader<std::io::Cursor<Vec<u8>>>,
    }

    #[async_trait]
    impl FrameReader for VecReader {
        async fn read_frame(&mut self) -> Result<Option<String>, EngineError> {
            frame_mod::read_line(&mut self.inner)
                .await
                .map_err(|e| EngineError::Transport(e.to_string()))
        }
    }

    #[tokio::test]
    async fn test_vec_reader_reads_line_by_line() {
        let data = b"{\"a\":1}\n{\"b\":2}\n".to_vec();
        let mut reader = VecReader {
            inner: TokioBufReader::new(std::io::Cursor::new(data)),
        };
        assert_eq!(reader.read_frame().await.unwrap(), Some("{\"a\":1}".to_string()));
        assert_eq!(reader.read_frame().await.unwrap(), Some("{\"b\":2}".to_string()));
        assert_eq!(reader.read_frame().await.unwrap(), None);
    }

    struct VecWriter {
        buf: Vec<u8>,
    }

    #[async_trait]
    impl FrameWriter for VecWriter {
        async fn write_frame(&mut self, value: &serde_json::Value) -> Result<(), EngineError> {
            frame_mod::write_frame(&mut self.buf, value)
                .await
                .map_err(|e| EngineError::Transport(e.to_string()))
        }

        async fn shutdown(&mut self) -> Result<(), EngineError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_vec_writer_appends_newline_delimited_frames() {
        let mut writer = VecWriter { buf: Vec::new() };
        writer.write_frame(&json!({"x": 1})).await.unwrap();
        writer.write_frame(&json!({"y": 2})).await.unwrap();
        assert_eq!(writer.buf, b"{\"x\":1}\n{\"y\":2}\n");
    }
}
