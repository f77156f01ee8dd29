//! vaccine-checker — Binary Entrypoint
//! Resolves settings, wires the HTTP-backed checker and runs the poll loop
//! until interrupted.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vaccine_checker::config::file::load_config_default;
use vaccine_checker::config::{Cli, Settings};
use vaccine_checker::metrics::install_exporter;
use vaccine_checker::scheduler::{run_until, SchedulerCfg};
use vaccine_checker::{build_checker, Point};

const EXIT_STARTUP_FAILURE: u8 = 1;
const EXIT_FLAG_PARSE: u8 = 2;
const EXIT_CONFIG_FILE: u8 = 3;
const EXIT_INVALID_PARAMS: u8 = 4;

/// Compact logs by default, JSON when asked. `RUST_LOG` overrides the filter.
fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("vaccine_checker=info,heartbeat=info,warn"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

async fn wait_for_shutdown() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => tracing::info!("received Ctrl+C"),
                    _ = sigterm.recv() => tracing::info!("received SIGTERM"),
                }
                return;
            }
            Err(e) => tracing::warn!(error = %e, "cannot listen for SIGTERM"),
        }
    }

    if let Err(e) = ctrl_c.await {
        tracing::warn!(error = %e, "cannot listen for Ctrl+C; running until killed");
        std::future::pending::<()>().await;
    }
    tracing::info!("received Ctrl+C");
}

async fn run(settings: Settings, location: Point) -> anyhow::Result<()> {
    if let Some(addr) = settings.metrics_addr {
        install_exporter(addr)?;
    }

    let mut checker = build_checker(&settings, location)?;
    let cfg = SchedulerCfg {
        check_interval: settings.check_interval,
        tick_interval: settings.tick_interval,
    };

    let cycles = run_until(&mut checker, cfg, wait_for_shutdown()).await;
    println!("terminating...");
    tracing::info!(cycles, "poll loop stopped");
    println!("done.");
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            return ExitCode::from(EXIT_FLAG_PARSE);
        }
        // --help / --version
        Err(e) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
    };

    let file = match load_config_default(cli.config.as_deref()) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("fatal error reading config file: {e:#}");
            return ExitCode::from(EXIT_CONFIG_FILE);
        }
    };

    let settings = Settings::layered(&cli, file);
    init_tracing(settings.log_json);

    let location = match settings.validate() {
        Ok(loc) => loc,
        Err(e) => {
            eprintln!("invalid params:");
            for v in &e.violations {
                eprintln!("  - {v}");
            }
            return ExitCode::from(EXIT_INVALID_PARAMS);
        }
    };

    match run(settings, location).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let error = format!("{e:#}");
            tracing::error!(%error, "startup failed");
            ExitCode::from(EXIT_STARTUP_FAILURE)
        }
    }
}
