//! mcp-engine - core Model Context Protocol broker
//!
//! Main entry point: load configuration, bring up the configured
//! transport(s), and run the session loop until the peer disconnects.

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mcp_engine::cli::Cli;
use mcp_engine::config::EngineConfig;
use mcp_engine::engine::handlers::EngineContext;
use mcp_engine::engine::run_session;
use mcp_engine::transport::sse::SseTransport;
use mcp_engine::transport::stdio::StdioTransport;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let (config, config_file_missing) = EngineConfig::load_layered(config_path, &cli)?;

    // Tracing must be live before anything -- including the missing-file
    // notice below -- gets logged, and its own settings come from this
    // config, so it has to be initialized from the already-built config
    // rather than before `load_layered` runs.
    init_tracing(&config);

    if config_file_missing {
        tracing::warn!("config file not found at {}, using defaults", config_path);
    }

    config.validate()?;

    tracing::info!(
        project_root = %config.project.root_path.display(),
        stdio = config.stdio.enabled,
        sse = config.sse.enabled,
        "starting mcp-engine"
    );

    let ctx = EngineContext::new(config.clone());
    let mut tasks = tokio::task::JoinSet::new();

    if config.stdio.enabled {
        let ctx = ctx.clone();
        tasks.spawn(async move {
            tracing::info!("stdio transport ready");
            run_session(ctx, Box::new(StdioTransport::new())).await;
            tracing::info!("stdio session ended");
        });
    }

    if config.sse.enabled {
        let (transport, server) = SseTransport::bind(
            &config.sse.bind_addr,
            &config.sse.sse_path,
            &config.sse.post_path,
            config.sse.subscriber_timeout_secs,
            config.inbound_queue_capacity,
        )
        .await?;

        tracing::info!(bind_addr = %config.sse.bind_addr, "SSE transport listening");
        tokio::spawn(async move {
            if let Err(e) = server.serve().await {
                tracing::error!(error = %e, "SSE server exited with an error");
            }
        });

        let ctx = ctx.clone();
        tasks.spawn(async move {
            run_session(ctx, Box::new(transport)).await;
            tracing::info!("SSE session ended");
        });
    }

    while tasks.join_next().await.is_some() {}

    Ok(())
}

/// Initialize tracing per the loaded config: an env-filter-compatible
/// directive, optional JSON formatting, and an optional mirrored file
/// output alongside stderr.
fn init_tracing(config: &EngineConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log.level.clone()));

    let registry = tracing_subscriber::registry().with(env_filter);

    match (&config.log.output, config.log.json) {
        (Some(path), true) => {
            if let Ok(file) = std::fs::File::create(path) {
                registry
                    .with(tracing_subscriber::fmt::layer().json())
                    .with(tracing_subscriber::fmt::layer().json().with_writer(file))
                    .init();
            } else {
                registry.with(tracing_subscriber::fmt::layer().json()).init();
            }
        }
        (Some(path), false) => {
            if let Ok(file) = std::fs::File::create(path) {
                registry
                    .with(tracing_subscriber::fmt::layer())
                    .with(tracing_subscriber::fmt::layer().with_writer(file))
                    .init();
            } else {
                registry.with(tracing_subscriber::fmt::layer()).init();
            }
        }
        (None, true) => {
            registry.with(tracing_subscriber::fmt::layer().json()).init();
        }
        (None, false) => {
            registry.with(tracing_subscriber::fmt::layer()).init();
        }
    }
}
