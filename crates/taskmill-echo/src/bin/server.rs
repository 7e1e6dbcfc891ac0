use anyhow::bail;
use clap::Parser;
use std::time::Duration;
use taskmill::{AtomicCounter, Counter, PeriodicConfig, PeriodicWorker, StopOutcome};
use taskmill_echo::serve;
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::EnvFilter;

/// Runtime configuration for the echo server binary.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "taskmill-echo-server",
    version,
    about = "A one-shot TCP request/response server"
)]
struct CliArgs {
    /// Address to listen on.
    ///
    /// Environment variable: `SERVER_ADDR`
    #[arg(long, env = "SERVER_ADDR", default_value_t = String::from("127.0.0.1:8080"))]
    server_addr: String,

    /// Seconds between served-connection reports.
    ///
    /// Environment variable: `REPORT_INTERVAL_SECS`
    #[arg(long, env = "REPORT_INTERVAL_SECS", default_value_t = 5)]
    report_interval_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    if args.report_interval_secs == 0 {
        bail!("REPORT_INTERVAL_SECS must be greater than 0");
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let listener = TcpListener::bind(&args.server_addr).await?;
    tracing::info!("server listening on {}", args.server_addr);

    let handled = AtomicCounter::new();
    let reporter = {
        let handled = handled.clone();
        PeriodicWorker::start(
            PeriodicConfig {
                interval: Duration::from_secs(args.report_interval_secs),
                ..Default::default()
            },
            move |_now| {
                tracing::info!(connections = handled.get(), "served so far");
                Ok(())
            },
        )
    };

    tokio::select! {
        res = serve(listener, handled.clone()) => res?,
        _ = signal::ctrl_c() => {
            tracing::info!("received ctrl-c, shutting down");
        }
    }

    match reporter.stop().await {
        StopOutcome::Graceful => tracing::info!("stopped connection reporter"),
        StopOutcome::TimedOut => tracing::warn!("connection reporter did not stop in time"),
    }
    tracing::info!(connections = handled.get(), "server shut down");
    Ok(())
}
