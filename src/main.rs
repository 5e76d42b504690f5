use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;

use uroman_mcp_server::config::{Platform, ServerConfig};
use uroman_mcp_server::engine::{ProcessEngine, RomanizationEngine};
use uroman_mcp_server::logging;
use uroman_mcp_server::platform::{HttpAdapter, StdioAdapter};

#[tokio::main]
async fn main() {
    let config = match ServerConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("uroman-mcp-server: configuration error: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = logging::init(config.log_level, config.log_format) {
        eprintln!("uroman-mcp-server: failed to initialize logging: {e}");
    }

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "fatal error");
        eprintln!("uroman-mcp-server: fatal error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let engine: Arc<dyn RomanizationEngine> = Arc::new(ProcessEngine::from_command_line(&config.uroman_command));

    tracing::info!(
        platform = config.platform.as_str(),
        engine = %config.uroman_command,
        version = env!("CARGO_PKG_VERSION"),
        "starting uroman MCP server",
    );

    match config.platform {
        Platform::Http => {
            let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
            let adapter = HttpAdapter::from_config(&config, engine);
            if config.prewarm {
                adapter.dispatcher().prewarm().await;
            }
            let listener = TcpListener::bind(addr).await?;
            adapter.serve(listener, shutdown_signal()).await?;
            tracing::info!("server shutdown complete");
        }
        Platform::Stdio => {
            let adapter = StdioAdapter::from_config(&config, engine);
            if config.prewarm {
                adapter.dispatcher().prewarm().await;
            }
            adapter.run().await?;
        }
        Platform::Lambda => {
            anyhow::bail!("the lambda platform runs inside a function runtime; embed platform::LambdaAdapter there");
        }
    }

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("received SIGTERM, initiating graceful shutdown");
        }
    }
}
