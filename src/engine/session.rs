//! Session state machine (C4).
//!
//! Tracks the handshake lifecycle: `AwaitingInitialize` ->
//! `AwaitingInitializedNotification` -> `Ready` -> `ShuttingDown`. There is
//! exactly one session per transport connection and transitions are applied
//! serially by the single session worker, so no locking is needed here --
//! the struct is owned, not shared.

use std::fmt;

/// `notifications/initialized` is the canonical method name; `initialized`
/// is a legacy alias some older clients still emit. The engine accepts
/// both interchangeably.
pub fn is_initialized_notification(method: &str) -> bool {
    method == "notifications/initialized" || method == "initialized"
}

/// Handshake lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingInitialize,
    AwaitingInitializedNotification,
    Ready,
    ShuttingDown,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionState::AwaitingInitialize => "awaiting_initialize",
            SessionState::AwaitingInitializedNotification => {
                "awaiting_initialized_notification"
            }
            SessionState::Ready => "ready",
            SessionState::ShuttingDown => "shutting_down",
        };
        write!(f, "{s}")
    }
}

/// What the session worker should do with an incoming request or
/// notification method given the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// Allow it through to the dispatcher.
    Allow,
    /// Reject with InvalidRequest; the handshake has not reached a state
    /// where this method is legal.
    RejectNotReady,
}

/// Session handshake state and the gating rules around it.
///
/// The stricter handshake variant is used: once `initialize` has been
/// handled, any further *Request* received before
/// `notifications/initialized` arrives is rejected with InvalidRequest
/// rather than silently tolerated.
pub struct Session {
    state: SessionState,
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: SessionState::AwaitingInitialize,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Gate a request by method name against the current state. Does not
    /// itself transition state -- `initialize` only transitions on a
    /// successful handler response, which the dispatcher reports back via
    /// [`Session::mark_initialized`].
    pub fn gate_request(&self, method: &str) -> Gate {
        match self.state {
            SessionState::AwaitingInitialize => {
                if method == "initialize" {
                    Gate::Allow
                } else {
                    Gate::RejectNotReady
                }
            }
            SessionState::AwaitingInitializedNotification => Gate::RejectNotReady,
            SessionState::Ready => {
                if method == "initialize" {
                    // Duplicate initialize is protocol abuse, not a
                    // legal re-negotiation -- reject rather than
                    // re-running the handshake handler, which would
                    // otherwise trip mark_initialize_handled's state
                    // assertion.
                    Gate::RejectNotReady
                } else {
                    Gate::Allow
                }
            }
            SessionState::ShuttingDown => Gate::RejectNotReady,
        }
    }

    /// Gate a notification by method name. Notifications other than
    /// `notifications/initialized` (or its legacy alias `initialized`) are
    /// simply dropped (never rejected -- notifications have no response
    /// channel) when the session is not ready; the caller is expected to
    /// check the return value only to decide whether to log the drop.
    pub fn gate_notification(&self, method: &str) -> Gate {
        match self.state {
            SessionState::AwaitingInitializedNotification => {
                if is_initialized_notification(method) {
                    Gate::Allow
                } else {
                    Gate::RejectNotReady
                }
            }
            SessionState::Ready => Gate::Allow,
            SessionState::AwaitingInitialize | SessionState::ShuttingDown => {
                Gate::RejectNotReady
            }
        }
    }

    /// Call once the `initialize` handler has produced a successful
    /// response. Advances to `AwaitingInitializedNotification`.
    pub fn mark_initialize_handled(&mut self) {
        debug_assert_eq!(self.state, SessionState::AwaitingInitialize);
        self.state = SessionState::AwaitingInitializedNotification;
    }

    /// Call once `notifications/initialized` has been observed. Advances
    /// to `Ready`.
    pub fn mark_initialized(&mut self) {
        debug_assert_eq!(self.state, SessionState::AwaitingInitializedNotification);
        self.state = SessionState::Ready;
    }

    pub fn begin_shutdown(&mut self) {
        self.state = SessionState::ShuttingDown;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
