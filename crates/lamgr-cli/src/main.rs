//! CLI entry point.
//!
//! Starts the adapter at boot, serves the UI surface on stdin/stdout, and
//! stops the adapter when the surface goes away or on Ctrl-C.

use std::time::Duration;

use clap::Parser;
use lamgr_cli::{Cli, CliConfig, bootstrap, serve};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Grace period for background tasks once the session is over.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(1);

fn init_tracing(cli: &Cli) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.default_log_filter()));

    // stdout carries the message protocol
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

async fn run(config: CliConfig) -> anyhow::Result<()> {
    let ctx = bootstrap(&config);

    match ctx.supervisor.start().await {
        Ok(pid) => info!(pid = %pid, "Adapter launched at boot"),
        Err(e) => error!(error = %e, "Failed to launch adapter at boot"),
    }

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupt received");
                cancel.cancel();
            }
        }
    });

    let served = serve(&ctx, tokio::io::stdin(), tokio::io::stdout(), cancel).await;

    info!("Stopping adapter");
    if let Err(e) = ctx.supervisor.stop().await {
        warn!(error = %e, "Failed to stop adapter on shutdown");
    }

    served
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let config = CliConfig::with_defaults()?;
    info!(path = %config.adapter_path.display(), "Resolved adapter executable");

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(run(config));
    // A pending stdin read holds a blocking thread until more input arrives
    runtime.shutdown_timeout(SHUTDOWN_TIMEOUT);

    result
}
