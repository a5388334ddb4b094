//! The engine (C8): wires a transport, the session state machine, and
//! method dispatch into one run loop per connection.
//!
//! Concurrency model: a dedicated reader task is the sole reader of the
//! transport's read half and feeds a bounded channel -- the inbound
//! queue. `run_session` drains that queue and classifies each frame.
//! The session gate check (and, for `initialize`, the state mutation
//! that follows it) always runs synchronously in this loop, in frame
//! arrival order, before anything is spawned -- gating from inside a
//! spawned task would let a notification race ahead of the `initialize`
//! request queued in front of it and see stale state. Once a non-
//! `initialize` request has passed the gate, its handler is dispatched
//! as an independent task (no session access needed) so a slow one --
//! `ping`'s 5s timeout, the `fetch` tool's 30s HTTP timeout -- never
//! holds up frames already queued behind it. Outbound frames go through
//! one shared writer lane so they are never interleaved mid-write.

pub mod codec;
pub mod dispatcher;
pub mod frame;
pub mod handlers;
pub mod id;
pub mod message;
pub mod registry;
pub mod resources;
pub mod session;

use crate::engine::handlers::EngineContext;
use crate::engine::id::RequestId;
use crate::engine::message::{classify, ClassifiedMessage, RpcError, RpcResponse};
use crate::engine::session::{Gate, Session};
use crate::transport::{FrameReader, FrameWriter, Transport};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinSet;

/// Run one session to completion: until the transport's read half
/// observes a clean close and every in-flight request task has finished.
pub async fn run_session(ctx: EngineContext, transport: Box<dyn Transport>) {
    let (reader, writer) = transport.split();
    let capacity = ctx.config.inbound_queue_capacity;
    let (tx, mut rx) = tokio::sync::mpsc::channel::<String>(capacity);

    let reader_task = tokio::spawn(reader_loop(reader, tx));

    let writer: Arc<Mutex<Box<dyn FrameWriter>>> = Arc::new(Mutex::new(writer));
    let session = Arc::new(Mutex::new(Session::new()));
    let mut in_flight: JoinSet<()> = JoinSet::new();

    while let Some(line) = rx.recv().await {
        let value: serde_json::Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                let response = RpcResponse::error(
                    RequestId::Null,
                    RpcError::new(RpcError::PARSE_ERROR, format!("invalid JSON: {e}")),
                );
                write_response(&writer, &response).await;
                continue;
            }
        };

        match classify(&value) {
            ClassifiedMessage::Request { id, method, params } if method == "initialize" => {
                // Handled synchronously, in frame order, since a
                // successful initialize mutates session state that the
                // very next queued frame (typically
                // notifications/initialized) is gated against.
                let response = {
                    let mut session = session.lock().await;
                    dispatcher::dispatch_initialize(&ctx, &mut session, id, params).await
                };
                write_response(&writer, &response).await;
            }
            ClassifiedMessage::Request { id, method, params } => {
                let (gate, state) = {
                    let session = session.lock().await;
                    (session.gate_request(&method), session.state())
                };

                if gate == Gate::RejectNotReady {
                    let response = RpcResponse::error(
                        id,
                        RpcError::new(
                            RpcError::INVALID_REQUEST,
                            format!("method \"{method}\" is not valid in state {state}"),
                        ),
                    );
                    write_response(&writer, &response).await;
                } else {
                    let ctx = ctx.clone();
                    let writer = Arc::clone(&writer);
                    in_flight.spawn(async move {
                        let response = dispatcher::dispatch_gated(&ctx, id, &method, params).await;
                        write_response(&writer, &response).await;
                    });
                }
            }
            ClassifiedMessage::Notification { method, .. } => {
                let mut session = session.lock().await;
                if !dispatcher::dispatch_notification(&mut session, &method) {
                    tracing::warn!(%method, "dropped notification: session not ready for it");
                }
            }
            ClassifiedMessage::Response { id, .. } | ClassifiedMessage::ErrorResponse { id, .. } => {
                tracing::warn!(%id, "dropped unsolicited response: engine never acts as a client");
            }
            ClassifiedMessage::Malformed { id: Some(id), reason } => {
                let response = RpcResponse::error(id, RpcError::new(RpcError::INVALID_REQUEST, reason));
                write_response(&writer, &response).await;
            }
            ClassifiedMessage::Malformed { id: None, reason } => {
                tracing::warn!(%reason, "dropped malformed frame with no recoverable id");
            }
        }
    }

    while in_flight.join_next().await.is_some() {}
    let _ = reader_task.await;

    let mut writer = writer.lock().await;
    let _ = writer.shutdown().await;
}

async fn reader_loop(mut reader: Box<dyn FrameReader>, tx: tokio::sync::mpsc::Sender<String>) {
    loop {
        match reader.read_frame().await {
            Ok(Some(line)) => {
                // A full channel blocks here rather than dropping the
                // frame -- the stdio/SSE-inbound policy is to apply
                // backpressure to whatever is feeding this reader.
                if tx.send(line).await.is_err() {
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "transport read failed, ending session");
                break;
            }
        }
    }
}

async fn write_response(writer: &Arc<Mutex<Box<dyn FrameWriter>>>, response: &RpcResponse) {
    let value = serde_json::to_value(response).expect("RpcResponse always serializes");
    let mut writer = writer.lock().await;
    if let Err(e) = writer.write_frame(&value).await {
        tracing::error!(error = %e, "failed to write response frame");
    }
}
