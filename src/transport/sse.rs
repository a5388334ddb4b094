//! SSE/HTTP transport (C2).
//!
//! A GET endpoint streams outbound frames as Server-Sent Events to a
//! single subscriber; a POST endpoint accepts inbound frames as JSON
//! request bodies. Unlike stdio, the listener is already running by the
//! time a peer connects, so [`SseTransport::bind`] hands back both the
//! `Transport` handle and a separate [`SseServer`] the caller spawns
//! alongside the session loop.
//!
//! Only one subscriber is served at a time (multi-client fan-out is out
//! of scope). The POST handler never blocks: a full or unavailable
//! inbound queue replies 503 rather than waiting, which is the opposite
//! policy from stdio's blocking reader -- there is no peer to apply
//! backpressure to over HTTP, so dropping the request and letting the
//! client retry is the only option.

use super::{FrameReader, FrameWriter, Transport};
use crate::error::EngineError;
use async_trait::async_trait;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::stream::{self, StreamExt};
use serde_json::Value;
use std::convert::Infallible;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, Notify};
use tokio_stream::wrappers::ReceiverStream;

const SUBSCRIBER_CHANNEL_CAPACITY: usize = 64;

struct Shared {
    inbound_tx: mpsc::Sender<String>,
    subscriber: StdMutex<Option<mpsc::Sender<String>>>,
    subscriber_connected: Notify,
    subscriber_timeout: Duration,
    endpoint_path: String,
}

/// The read/write half of the SSE connection, handed to the session loop
/// via [`Transport::split`].
pub struct SseTransport {
    shared: Arc<Shared>,
    inbound_rx: mpsc::Receiver<String>,
}

/// The bound listener and router. Call [`SseServer::serve`] (typically
/// `tokio::spawn`ed) once the session loop is running off the paired
/// [`SseTransport`].
pub struct SseServer {
    listener: TcpListener,
    router: Router,
}

impl SseTransport {
    /// Bind the listener and wire up the shared channels. Returns the
    /// transport half and the server half as a pair so the caller
    /// controls when the HTTP server actually starts accepting.
    pub async fn bind(
        bind_addr: &str,
        sse_path: &str,
        post_path: &str,
        subscriber_timeout_secs: u64,
        inbound_queue_capacity: usize,
    ) -> Result<(Self, SseServer), EngineError> {
        let (inbound_tx, inbound_rx) = mpsc::channel(inbound_queue_capacity);
        let shared = Arc::new(Shared {
            inbound_tx,
            subscriber: StdMutex::new(None),
            subscriber_connected: Notify::new(),
            subscriber_timeout: Duration::from_secs(subscriber_timeout_secs),
            endpoint_path: post_path.to_string(),
        });

        let router = Router::new()
            .route(sse_path, get(handle_subscribe))
            .route(post_path, post(handle_post))
            .with_state(Arc::clone(&shared));

        let listener = TcpListener::bind(bind_addr)
            .await
            .map_err(|e| EngineError::Transport(format!("failed to bind {bind_addr}: {e}")))?;

        Ok((
            Self {
                shared: Arc::clone(&shared),
                inbound_rx,
            },
            SseServer { listener, router },
        ))
    }
}

impl SseServer {
    /// Serve HTTP requests until the listener errors out.
    pub async fn serve(self) -> Result<(), EngineError> {
        axum::serve(self.listener, self.router)
            .await
            .map_err(|e| EngineError::Transport(format!("SSE server failed: {e}")))
    }
}

impl Transport for SseTransport {
    fn split(self: Box<Self>) -> (Box<dyn FrameReader>, Box<dyn FrameWriter>) {
        let reader = SseReader { rx: self.inbound_rx };
        let writer = SseWriter { shared: self.shared };
        (Box::new(reader), Box::new(writer))
    }
}

struct SseReader {
    rx: mpsc::Receiver<String>,
}

#[async_trait]
impl FrameReader for SseReader {
    async fn read_frame(&mut self) -> Result<Option<String>, EngineError> {
        Ok(self.rx.recv().await)
    }
}

struct SseWriter {
    shared: Arc<Shared>,
}

#[async_trait]
impl FrameWriter for SseWriter {
    async fn write_frame(&mut self, value: &Value) -> Result<(), EngineError> {
        let line = serde_json::to_string(value)?;

        loop {
            // Register interest before checking the slot so a subscriber
            // that connects between the check and the wait is never missed.
            let notified = self.shared.subscriber_connected.notified();
            let sender = self.shared.subscriber.lock().unwrap().clone();

            if let Some(sender) = sender {
                return sender
                    .send(line)
                    .await
                    .map_err(|_| EngineError::Transport("SSE subscriber disconnected".to_string()));
            }

            if tokio::time::timeout(self.shared.subscriber_timeout, notified)
                .await
                .is_err()
            {
                return Err(EngineError::Transport(
                    "no SSE subscriber connected within timeout".to_string(),
                ));
            }
        }
    }

    async fn shutdown(&mut self) -> Result<(), EngineError> {
        Ok(())
    }
}

/// Clears the subscriber slot when the SSE response stream is dropped
/// (client disconnect, server shutdown). Held alive by being moved into
/// the stream's final `.map` closure rather than by any explicit field,
/// since axum gives us no direct hook for "subscriber went away".
struct SubscriberGuard {
    shared: Arc<Shared>,
}

impl Drop for SubscriberGuard {
    fn drop(&mut self) {
        *self.shared.subscriber.lock().unwrap() = None;
    }
}

async fn handle_subscribe(State(shared): State<Arc<Shared>>) -> Response {
    let (tx, rx) = mpsc::channel::<String>(SUBSCRIBER_CHANNEL_CAPACITY);
    {
        let mut slot = shared.subscriber.lock().unwrap();
        if slot.is_some() {
            return (StatusCode::SERVICE_UNAVAILABLE, "a subscriber is already connected")
                .into_response();
        }
        *slot = Some(tx);
    }
    shared.subscriber_connected.notify_waiters();

    let endpoint_event = Event::default().event("endpoint").data(shared.endpoint_path.clone());
    let frames = ReceiverStream::new(rx).map(|line| Ok::<_, Infallible>(Event::default().data(line)));
    let guard = SubscriberGuard { shared: Arc::clone(&shared) };
    let stream = stream::once(async move { Ok::<_, Infallible>(endpoint_event) })
        .chain(frames)
        .map(move |item| {
            let _ = &guard;
            item
        });

    Sse::new(stream).keep_alive(KeepAlive::default()).into_response()
}

async fn handle_post(State(shared): State<Arc<Shared>>, Json(body): Json<Value>) -> StatusCode {
    let line = match serde_json::to_string(&body) {
        Ok(l) => l,
        Err(_) => return StatusCode::BAD_REQUEST,
    };

    match shared.inbound_tx.try_send(line) {
        Ok(()) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn shared_with(cap: usize, timeout_secs: u64) -> (Arc<Shared>, mpsc::Receiver<String>) {
        let (inbound_tx, inbound_rx) = mpsc::channel(cap);
        let shared = Arc::new(Shared {
            inbound_tx,
            subscriber: StdMutex::new(None),
            subscriber_connected: Notify::new(),
            subscriber_timeout: Duration::from_secs(timeout_secs),
            endpoint_path: "/messages".to_string(),
        });
        (shared, inbound_rx)
    }

    #[tokio::test]
    async fn test_post_enqueues_when_capacity_available() {
        let (shared, mut inbound_rx) = shared_with(4, 1);
        let status = handle_post(State(Arc::clone(&shared)), Json(json!({"a": 1}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(inbound_rx.recv().await.unwrap(), r#"{"a":1}"#);
    }

    #[tokio::test]
    async fn test_post_returns_503_when_queue_full() {
        let (shared, _rx) = shared_with(1, 1);
        shared.inbound_tx.try_send("{}".to_string()).unwrap();
        let status = handle_post(State(shared), Json(json!({"a": 1}))).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_write_frame_times_out_without_subscriber() {
        let (shared, _inbound_rx) = shared_with(4, 0);
        let mut writer = SseWriter { shared };
        let err = writer.write_frame(&json!({"x": 1})).await.unwrap_err();
        assert!(matches!(err, EngineError::Transport(_)));
    }

    #[tokio::test]
    async fn test_write_frame_delivers_to_connected_subscriber() {
        let (shared, _inbound_rx) = shared_with(4, 5);
        let (tx, mut rx) = mpsc::channel(4);
        *shared.subscriber.lock().unwrap() = Some(tx);
        shared.subscriber_connected.notify_waiters();

        let mut writer = SseWriter { shared };
        writer.write_frame(&json!({"x": 1})).await.unwrap();
        assert_eq!(rx.recv().await.unwrap(), r#"{"x":1}"#);
    }

    #[tokio::test]
    async fn test_second_subscriber_rejected_with_503() {
        let (shared, _inbound_rx) = shared_with(4, 1);
        *shared.subscriber.lock().unwrap() = Some(mpsc::channel(1).0);

        let response = handle_subscribe(State(shared)).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_reader_receives_enqueued_frames_then_closes() {
        let (tx, rx) = mpsc::channel(4);
        tx.send("{\"a\":1}".to_string()).await.unwrap();
        drop(tx);
        let mut reader = SseReader { rx };
        assert_eq!(reader.read_frame().await.unwrap(), Some("{\"a\":1}".to_string()));
        assert_eq!(reader.read_frame().await.unwrap(), None);
    }
}
