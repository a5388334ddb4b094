//! Capability handlers (C7): one function per supported method.
//!
//! Handlers are pure with respect to session state -- they never touch
//! [`crate::engine::session::Session`] directly. The dispatcher advances
//! the handshake state machine after a successful `initialize` response.

pub mod initialize;
pub mod ping;
pub mod prompts;
pub mod resources;
pub mod tools;

use crate::config::EngineConfig;
use crate::engine::registry::{PromptRegistry, ToolRegistry};
use std::sync::Arc;

/// Shared, read-only state every handler needs. Cheap to clone (`Arc`
/// internals); one instance is built at startup and handed to every
/// session worker regardless of transport.
#[derive(Clone)]
pub struct EngineContext {
    pub config: Arc<EngineConfig>,
    pub tools: Arc<ToolRegistry>,
    pub prompts: Arc<PromptRegistry>,
    pub http_client: reqwest::Client,
}

impl EngineContext {
    pub fn new(config: EngineConfig) -> Self {
        let http_client = reqwest::Client::new();
        let tools = ToolRegistry::with_reference_tools(http_client.clone());
        let prompts = PromptRegistry::with_reference_prompts();
        Self {
            config: Arc::new(config),
            tools: Arc::new(tools),
            prompts: Arc::new(prompts),
            http_client,
        }
    }
}
