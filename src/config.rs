//! Configuration management for the MCP engine
//!
//! Handles loading, parsing, validating, and layering configuration from
//! files, environment variables, and CLI overrides (CLI wins).

use crate::cli::{Cli, Commands};
use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Top-level engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Logging configuration.
    #[serde(default)]
    pub log: LogConfig,

    /// Project settings (file resource sandbox root).
    pub project: ProjectConfig,

    /// Stdio transport settings.
    #[serde(default)]
    pub stdio: StdioConfig,

    /// SSE/HTTP transport settings.
    #[serde(default)]
    pub sse: SseConfig,

    /// Capacity of the bounded inbound frame queue.
    #[serde(default = "default_queue_capacity")]
    pub inbound_queue_capacity: usize,
}

fn default_queue_capacity() -> usize {
    256
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// `tracing` filter directive, e.g. "mcp_engine=info".
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Optional path to additionally mirror logs into.
    #[serde(default)]
    pub output: Option<PathBuf>,

    /// Emit logs as JSON instead of the default human-readable format.
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "mcp_engine=info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            output: None,
            json: false,
        }
    }
}

/// Project settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Root directory that sandboxes `file://` resource resolution.
    #[serde(rename = "rootPath", default = "default_project_root")]
    pub root_path: PathBuf,
}

fn default_project_root() -> PathBuf {
    PathBuf::from(".")
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            root_path: default_project_root(),
        }
    }
}

/// Stdio transport settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StdioConfig {
    /// Whether the stdio transport should be started.
    #[serde(default = "default_stdio_enabled")]
    pub enabled: bool,
}

fn default_stdio_enabled() -> bool {
    true
}

impl Default for StdioConfig {
    fn default() -> Self {
        Self {
            enabled: default_stdio_enabled(),
        }
    }
}

/// SSE/HTTP transport settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SseConfig {
    /// Whether the SSE transport should be started.
    #[serde(default)]
    pub enabled: bool,

    /// Address to bind the SSE HTTP listener to.
    #[serde(rename = "bindAddr", default = "default_bind_addr")]
    pub bind_addr: String,

    /// Path for the GET SSE subscription endpoint.
    #[serde(rename = "ssePath", default = "default_sse_path")]
    pub sse_path: String,

    /// Path for the POST inbound-frame endpoint.
    #[serde(rename = "postPath", default = "default_post_path")]
    pub post_path: String,

    /// Seconds `write_frame` will wait for a subscriber before timing out.
    #[serde(
        rename = "subscriberTimeoutSecs",
        default = "default_subscriber_timeout"
    )]
    pub subscriber_timeout_secs: u64,
}

fn default_bind_addr() -> String {
    "127.0.0.1:8642".to_string()
}

fn default_sse_path() -> String {
    "/sse".to_string()
}

fn default_post_path() -> String {
    "/messages".to_string()
}

fn default_subscriber_timeout() -> u64 {
    30
}

impl Default for SseConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            bind_addr: default_bind_addr(),
            sse_path: default_sse_path(),
            post_path: default_post_path(),
            subscriber_timeout_secs: default_subscriber_timeout(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from file with environment and CLI overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if a present config file cannot be parsed.
    pub fn load(path: &str, cli: &Cli) -> Result<Self> {
        let (config, used_defaults) = Self::load_layered(path, cli)?;
        if used_defaults {
            tracing::warn!("config file not found at {}, using defaults", path);
        }
        Ok(config)
    }

    /// Build the layered configuration (file, then env, then CLI overrides)
    /// without logging anything, reporting whether the file was missing.
    ///
    /// `load` can't log the missing-file case usefully before a tracing
    /// subscriber exists, and the subscriber itself is built from this same
    /// config's `log` settings. `main` calls this directly so it can
    /// initialize tracing from the real settings first, then replay the
    /// missing-file warning once there is somewhere for it to go.
    ///
    /// # Errors
    ///
    /// Returns an error if a present config file cannot be parsed.
    pub fn load_layered(path: &str, cli: &Cli) -> Result<(Self, bool)> {
        let (mut config, used_defaults) = if Path::new(path).exists() {
            (Self::from_file(path)?, false)
        } else {
            (Self::default(), true)
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok((config, used_defaults))
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| EngineError::Config(format!("failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| EngineError::Config(format!("failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            self.log.level = level;
        }
        if let Ok(output) = std::env::var("MCP_LOG_OUTPUT") {
            self.log.output = Some(PathBuf::from(output));
        }
        if let Ok(root) = std::env::var("MCP_PROJECT_ROOT") {
            self.project.root_path = PathBuf::from(root);
        }
        if let Ok(bind_addr) = std::env::var("MCP_BIND_ADDR") {
            self.sse.bind_addr = bind_addr;
        }
    }

    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if cli.verbose {
            self.log.level = "mcp_engine=debug".to_string();
        }

        if let Commands::Serve {
            project_root,
            log_level,
            log_output,
            stdio,
            sse,
            bind_addr,
        } = &cli.command
        {
            if let Some(root) = project_root {
                self.project.root_path = root.clone();
            }
            if let Some(level) = log_level {
                self.log.level = level.clone();
            }
            if let Some(output) = log_output {
                self.log.output = Some(output.clone());
            }
            if *stdio {
                self.stdio.enabled = true;
                self.sse.enabled = false;
            }
            if *sse {
                self.sse.enabled = true;
                self.stdio.enabled = false;
            }
            if let Some(addr) = bind_addr {
                self.sse.bind_addr = addr.clone();
            }
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation check fails.
    pub fn validate(&self) -> Result<()> {
        if self.project.root_path.as_os_str().is_empty() || !self.project.root_path.exists() {
            return Err(EngineError::Config(format!(
                "project.rootPath does not exist: {}",
                self.project.root_path.display()
            ))
            .into());
        }
        if !self.project.root_path.is_dir() {
            return Err(EngineError::Config(format!(
                "project.rootPath is not a directory: {}",
                self.project.root_path.display()
            ))
            .into());
        }

        if self.inbound_queue_capacity == 0 {
            return Err(
                EngineError::Config("inboundQueueCapacity must be greater than 0".to_string())
                    .into(),
            );
        }

        if self.sse.enabled {
            self.sse
                .bind_addr
                .parse::<SocketAddr>()
                .map_err(|e| EngineError::Config(format!("invalid sse.bindAddr: {}", e)))?;
        }

        if !self.stdio.enabled && !self.sse.enabled {
            return Err(EngineError::Config(
                "at least one of stdio or sse transport must be enabled".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log: LogConfig::default(),
            project: ProjectConfig::default(),
            stdio: StdioConfig::default(),
            sse: SseConfig::default(),
            inbound_queue_capacity: default_queue_capacity(),
        }
    }
}
