//! Execreceiver Binary Entry Point
//!
//! Loads a YAML configuration, runs one receiver and writes forwarded
//! metrics as JSON lines to stdout or a file. Logs go to stderr.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use execreceiver::{
    AppConfig, DEFAULT_SHUTDOWN_TIMEOUT, ExecReceiver, Host, JsonLinesConsumer, MetricsConsumer,
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Execreceiver - Periodic Script Metrics Receiver
#[derive(Parser, Debug)]
#[command(name = "execreceiver", version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(
        short,
        long,
        default_value = "configs/execreceiver.yaml",
        env = "EXECRECEIVER_CONFIG"
    )]
    config: PathBuf,

    /// Polling interval (overrides config file)
    #[arg(long, env = "EXECRECEIVER_INTERVAL")]
    interval: Option<String>,

    /// Script path (overrides config file)
    #[arg(long, env = "EXECRECEIVER_SCRIPT")]
    script: Option<PathBuf>,

    /// Interpreter binary (overrides config file)
    #[arg(long, env = "EXECRECEIVER_INTERPRETER")]
    interpreter: Option<PathBuf>,

    /// Output file for forwarded metrics (overrides config file)
    #[arg(short, long, env = "EXECRECEIVER_OUTPUT")]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Stdout carries metrics, so logs go to stderr.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,execreceiver=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let mut config = AppConfig::from_file(&cli.config)?;

    // CLI > ENV > config file
    if let Some(interval) = cli.interval {
        config.receiver.interval = interval;
    }
    if let Some(script) = cli.script {
        config.receiver.script = script;
    }
    if let Some(interpreter) = cli.interpreter {
        config.receiver.interpreter = interpreter;
    }
    if let Some(output) = cli.output {
        config.output = Some(output);
    }
    config.validate()?;

    let consumer: Arc<dyn MetricsConsumer> = match &config.output {
        Some(path) => Arc::new(JsonLinesConsumer::create(path).await?),
        None => Arc::new(JsonLinesConsumer::stdout()),
    };
    tracing::info!(
        interval = %config.receiver.interval,
        script = %config.receiver.script.display(),
        consumer = consumer.name(),
        "Configuration loaded"
    );

    let ctx = CancellationToken::new();
    let mut receiver = ExecReceiver::new(config.receiver, consumer);
    receiver.start(&ctx, &Host::default()).await?;

    tracing::info!("Press Ctrl+C to shutdown");
    shutdown_signal().await;

    receiver.shutdown(&ctx).await?;
    if !receiver.wait_stopped(DEFAULT_SHUTDOWN_TIMEOUT).await {
        tracing::warn!(
            timeout = ?DEFAULT_SHUTDOWN_TIMEOUT,
            "Receiver did not stop in time, abandoning in-flight tick"
        );
    }

    let stats = receiver.stats();
    tracing::info!(
        ticks = stats.ticks,
        forwarded = stats.forwarded,
        skipped = stats.skipped(),
        "Shutdown complete"
    );
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal");
        }
    }
}
