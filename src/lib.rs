//! mcp-engine - core Model Context Protocol broker
//!
//! This library provides a transport-agnostic MCP server: a JSON-RPC 2.0
//! message broker that enforces the initialize handshake, dispatches
//! requests to capability handlers, and exposes a tool/prompt/resource
//! surface over either stdio or SSE/HTTP.
//!
//! # Architecture
//!
//! - `engine`: session state machine, method dispatch, codec, handlers,
//!   and the tool/prompt/resource registries
//! - `transport`: the stdio and SSE/HTTP framings the engine runs over
//! - `config`: layered YAML + env + CLI configuration
//! - `error`: error types and JSON-RPC error code mapping
//! - `cli`: command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use mcp_engine::cli::Cli;
//! use mcp_engine::config::EngineConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let cli = Cli::default();
//!     let config = EngineConfig::load("config/config.yaml", &cli)?;
//!     config.validate()?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod transport;

pub use config::EngineConfig;
pub use error::{EngineError, Result};
