//! Method dispatch (C5): method name -> handler, with the session-state
//! gate applied first and exactly one response produced per request.

use crate::engine::handlers::{initialize, ping, prompts, resources, tools, EngineContext};
use crate::engine::id::RequestId;
use crate::engine::message::{RpcError, RpcResponse};
use crate::engine::session::{is_initialized_notification, Gate, Session};
use crate::error::EngineError;
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

type HandlerFuture<'a> = Pin<Box<dyn Future<Output = Result<Value, EngineError>> + Send + 'a>>;
type HandlerFn = for<'a> fn(&'a EngineContext, Option<Value>) -> HandlerFuture<'a>;

/// A per-request timeout applied on top of the handler's own internal
/// timeouts (e.g. the fetch tool's 30s HTTP timeout). `None` means no
/// dispatcher-level timeout is applied.
fn timeout_for(method: &str) -> Option<Duration> {
    match method {
        "ping" => Some(Duration::from_secs(5)),
        _ => None,
    }
}

fn lookup(method: &str) -> Option<HandlerFn> {
    match method {
        "initialize" => Some(|ctx, params| Box::pin(initialize::handle(ctx, params))),
        "ping" => Some(|ctx, params| Box::pin(ping::handle(ctx, params))),
        "tools/list" => Some(|ctx, params| Box::pin(tools::list(ctx, params))),
        "tools/call" => Some(|ctx, params| Box::pin(tools::call(ctx, params))),
        "prompts/list" => Some(|ctx, params| Box::pin(prompts::list(ctx, params))),
        "prompts/get" => Some(|ctx, params| Box::pin(prompts::get(ctx, params))),
        "resources/list" => Some(|ctx, params| Box::pin(resources::list(ctx, params))),
        "resources/templates/list" => {
            Some(|ctx, params| Box::pin(resources::list_templates(ctx, params)))
        }
        "resources/read" => Some(|ctx, params| Box::pin(resources::read(ctx, params))),
        _ => None,
    }
}

/// Dispatch a request that has already passed the session gate check and
/// is not `initialize` (see [`dispatch_initialize`]). Takes no session
/// reference at all, since every other method is read-only with respect
/// to session state -- this lets the caller release the session lock
/// before awaiting a potentially slow handler (`ping`'s 5s timeout, the
/// `fetch` tool's 30s HTTP timeout), so one slow request never blocks the
/// gate check for frames queued behind it.
///
/// Always returns exactly one `RpcResponse` -- every error path (unknown
/// method, handler error, timeout) is mapped onto a JSON-RPC error
/// response rather than propagated, since the dispatcher is the sole
/// producer of response frames and a panic here would silently drop the
/// client's pending request forever.
pub async fn dispatch_gated(
    ctx: &EngineContext,
    id: RequestId,
    method: &str,
    params: Option<Value>,
) -> RpcResponse {
    let handler = match lookup(method) {
        Some(h) => h,
        None => {
            return RpcResponse::error(
                id,
                RpcError::new(RpcError::METHOD_NOT_FOUND, format!("unknown method: {method}")),
            )
        }
    };

    let future = handler(ctx, params);
    let outcome = match timeout_for(method) {
        Some(duration) => match tokio::time::timeout(duration, future).await {
            Ok(result) => result,
            Err(_) => Err(EngineError::Internal(format!("{method} timed out"))),
        },
        None => future.await,
    };

    match outcome {
        Ok(result) => RpcResponse::success(id, result),
        Err(e) => RpcResponse::error(id, RpcError::new(e.rpc_code(), e.to_string())),
    }
}

/// Dispatch the `initialize` request.
///
/// Unlike every other method, `initialize` both reads and, on success,
/// mutates session state, and its ordering relative to the frames behind
/// it is load-bearing for the handshake (a `notifications/initialized`
/// sent immediately after must never be gated before this completes).
/// The caller is expected to hold the session lock across this call --
/// the handler itself does no I/O, so this never blocks the session
/// worker for long.
pub async fn dispatch_initialize(
    ctx: &EngineContext,
    session: &mut Session,
    id: RequestId,
    params: Option<Value>,
) -> RpcResponse {
    if session.gate_request("initialize") == Gate::RejectNotReady {
        return RpcResponse::error(
            id,
            RpcError::new(
                RpcError::INVALID_REQUEST,
                format!("method \"initialize\" is not valid in state {}", session.state()),
            ),
        );
    }

    match initialize::handle(ctx, params).await {
        Ok(result) => {
            session.mark_initialize_handled();
            RpcResponse::success(id, result)
        }
        Err(e) => RpcResponse::error(id, RpcError::new(e.rpc_code(), e.to_string())),
    }
}

/// Dispatch one classified request, gating on session state first.
///
/// This is the combined, non-concurrent convenience form used directly by
/// unit tests; [`run_session`](crate::engine::run_session) calls
/// [`dispatch_initialize`] and [`dispatch_gated`] separately so it can
/// release the session lock before awaiting a non-`initialize` handler.
pub async fn dispatch_request(
    ctx: &EngineContext,
    session: &mut Session,
    id: RequestId,
    method: &str,
    params: Option<Value>,
) -> RpcResponse {
    if method == "initialize" {
        return dispatch_initialize(ctx, session, id, params).await;
    }

    if session.gate_request(method) == Gate::RejectNotReady {
        return RpcResponse::error(
            id,
            RpcError::new(
                RpcError::INVALID_REQUEST,
                format!("method \"{method}\" is not valid in state {}", session.state()),
            ),
        );
    }

    dispatch_gated(ctx, id, method, params).await
}

/// Dispatch a notification. Returns `true` if it was accepted and acted
/// on, `false` if the session gate dropped it (notifications never get a
/// response frame either way).
pub fn dispatch_notification(session: &mut Session, method: &str) -> bool {
    if session.gate_notification(method) == Gate::RejectNotReady {
        return false;
    }

    if is_initialized_notification(method) {
        session.mark_initialized();
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use serde_json::json;

    fn ctx() -> EngineContext {
        EngineContext::new(EngineConfig::default())
    }

    #[tokio::test]
    async fn test_dispatch_unknown_method_is_method_not_found() {
        let mut session = Session::new();
        let response = dispatch_request(&ctx(), &mut session, RequestId::Num(1), "bogus", None).await;
        assert_eq!(response.error.unwrap().code, RpcError::METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_dispatch_rejects_ping_before_initialize() {
        let mut session = Session::new();
        let response = dispatch_request(&ctx(), &mut session, RequestId::Num(1), "ping", None).await;
        assert_eq!(response.error.unwrap().code, RpcError::INVALID_REQUEST);
    }

    #[tokio::test]
    async fn test_dispatch_initialize_advances_session_state() {
        let mut session = Session::new();
        let params = json!({
            "protocolVersion": "2024-11-05",
            "clientInfo": {"name": "c", "version": "1"}
        });
        let response =
            dispatch_request(&ctx(), &mut session, RequestId::Num(1), "initialize", Some(params))
                .await;
        assert!(response.result.is_some());
        assert_eq!(
            session.state(),
            crate::engine::session::SessionState::AwaitingInitializedNotification
        );
    }

    #[tokio::test]
    async fn test_dispatch_ping_after_handshake_succeeds() {
        let mut session = Session::new();
        session.mark_initialize_handled();
        session.mark_initialized();
        let response = dispatch_request(&ctx(), &mut session, RequestId::Num(2), "ping", None).await;
        assert!(response.result.is_some());
    }

    #[test]
    fn test_dispatch_notification_drops_when_not_ready() {
        let mut session = Session::new();
        assert!(!dispatch_notification(&mut session, "notifications/initialized"));
    }

    #[test]
    fn test_dispatch_notification_initialized_advances_state() {
        let mut session = Session::new();
        session.mark_initialize_handled();
        assert!(dispatch_notification(&mut session, "notifications/initialized"));
        assert_eq!(session.state(), crate::engine::session::SessionState::Ready);
    }

    #[test]
    fn test_dispatch_notification_legacy_alias_advances_state() {
        let mut session = Session::new();
        session.mark_initialize_handled();
        assert!(dispatch_notification(&mut session, "initialized"));
        assert_eq!(session.state(), crate::engine::session::SessionState::Ready);
    }

    #[tokio::test]
    async fn test_dispatch_duplicate_initialize_is_invalid_request() {
        let mut session = Session::new();
        session.mark_initialize_handled();
        session.mark_initialized();
        let params = json!({
            "protocolVersion": "2024-11-05",
            "clientInfo": {"name": "c", "version": "1"}
        });
        let response = dispatch_request(
            &ctx(),
            &mut session,
            RequestId::Num(9),
            "initialize",
            Some(params),
        )
        .await;
        assert_eq!(response.error.unwrap().code, RpcError::INVALID_REQUEST);
        assert_eq!(session.state(), crate::engine::session::SessionState::Ready);
    }
}
