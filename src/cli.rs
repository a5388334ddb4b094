//! Command-line interface definition for the MCP engine
//!
//! Defines the CLI structure using clap's derive API. The engine has a
//! single real mode of operation (`serve`): bring up one or both transports
//! and run the session until shutdown.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// mcp-engine - core Model Context Protocol broker
#[derive(Parser, Debug, Clone)]
#[command(name = "mcp-engine")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for mcp-engine
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the MCP engine until shutdown
    Serve {
        /// Root directory that sandboxes `file://` resource resolution
        #[arg(long)]
        project_root: Option<PathBuf>,

        /// Override the log level (trace, debug, info, warn, error)
        #[arg(long)]
        log_level: Option<String>,

        /// Write logs to this file in addition to stderr
        #[arg(long)]
        log_output: Option<PathBuf>,

        /// Run the stdio transport (default if neither --stdio nor --sse given)
        #[arg(long)]
        stdio: bool,

        /// Run the SSE/HTTP transport instead of stdio
        #[arg(long)]
        sse: bool,

        /// Bind address for the SSE transport (host:port)
        #[arg(long)]
        bind_addr: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            command: Commands::Serve {
                project_root: None,
                log_level: None,
                log_output: None,
                stdio: false,
                sse: false,
                bind_addr: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default() {
        let cli = Cli::default();
        assert_eq!(cli.config, Some("config/config.yaml".to_string()));
        assert!(!cli.verbose);
        assert!(matches!(cli.command, Commands::Serve { .. }));
    }

    #[test]
    fn test_cli_parse_serve() {
        let cli = Cli::try_parse_from(["mcp-engine", "serve"]);
        assert!(cli.is_ok());
        assert!(matches!(cli.unwrap().command, Commands::Serve { .. }));
    }

    #[test]
    fn test_cli_parse_serve_with_project_root() {
        let cli =
            Cli::try_parse_from(["mcp-engine", "serve", "--project-root", "/srv/project"]).unwrap();
        if let Commands::Serve { project_root, .. } = cli.command {
            assert_eq!(project_root, Some(PathBuf::from("/srv/project")));
        } else {
            panic!("expected Serve command");
        }
    }

    #[test]
    fn test_cli_parse_serve_with_sse_and_bind_addr() {
        let cli = Cli::try_parse_from([
            "mcp-engine",
            "serve",
            "--sse",
            "--bind-addr",
            "0.0.0.0:9000",
        ])
        .unwrap();
        if let Commands::Serve { sse, bind_addr, .. } = cli.command {
            assert!(sse);
            assert_eq!(bind_addr, Some("0.0.0.0:9000".to_string()));
        } else {
            panic!("expected Serve command");
        }
    }

    #[test]
    fn test_cli_parse_with_config_and_verbose() {
        let cli =
            Cli::try_parse_from(["mcp-engine", "-v", "--config", "custom.yaml", "serve"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some("custom.yaml".to_string()));
    }

    #[test]
    fn test_cli_parse_missing_command() {
        assert!(Cli::try_parse_from(["mcp-engine"]).is_err());
    }

    #[test]
    fn test_cli_parse_invalid_command() {
        assert!(Cli::try_parse_from(["mcp-engine", "bogus"]).is_err());
    }
}
