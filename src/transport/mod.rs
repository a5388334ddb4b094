//! Transport abstraction (C1/C2): stdio and SSE are two concrete
//! implementations of one trait, so the session loop in
//! [`crate::engine`] never knows which one it is talking to.

pub mod sse;
pub mod stdio;

use crate::error::EngineError;
use async_trait::async_trait;

/// The read half of a transport connection. Owned by the reader task,
/// which feeds a bounded inbound queue that the session worker drains.
#[async_trait]
pub trait FrameReader: Send {
    /// Read the next inbound frame. `Ok(None)` signals a clean close.
    async fn read_frame(&mut self) -> Result<Option<String>, EngineError>;
}

/// The write half of a transport connection. Owned by the single writer
/// lane so outbound frames are never interleaved mid-write.
#[async_trait]
pub trait FrameWriter: Send {
    /// Write one outbound frame.
    async fn write_frame(&mut self, frame: &serde_json::Value) -> Result<(), EngineError>;

    /// Best-effort orderly shutdown. Transports that have nothing to flush
    /// may no-op.
    async fn shutdown(&mut self) -> Result<(), EngineError>;
}

/// A bidirectional JSON-RPC frame channel that can be split into
/// independent read/write halves, so a dedicated reader task and the
/// single writer lane can each own their half without contending on a
/// shared lock. Both implementations (stdio, SSE) are symmetric in this
/// respect even though their underlying I/O shapes differ.
pub trait Transport: Send {
    fn split(self: Box<Self>) -> (Box<dyn FrameReader>, Box<dyn FrameWriter>);
}
