//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `vps_monitor` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting

use std::process;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;

use vps_monitor::cli::{Cli, Command, ConfigAction};
use vps_monitor::initialization::{init_client, init_logger_with};
use vps_monitor::server::{serve, shutdown_on_ctrl_c, spawn_scheduler, AppState};
use vps_monitor::storage::{load_site_config, save_site_config, KvStore, SqliteKvStore};
use vps_monitor::{Pipeline, SiteConfig, Trigger};

#[tokio::main]
async fn main() -> Result<()> {
    // Secrets (TGTOKEN, TGID, RATE_API) may live in a .env next to the binary
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let cli = Cli::parse();
    let config = cli.to_config();
    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;
    config.validate().context("Invalid configuration")?;

    let store: Arc<dyn KvStore> = Arc::new(
        SqliteKvStore::open(&config.db_path)
            .await
            .with_context(|| format!("Failed to open database {}", config.db_path.display()))?,
    );

    match cli.command {
        Command::Config { action } => match action {
            ConfigAction::Show => {
                let site = load_site_config(store.as_ref()).await?;
                println!("{}", serde_json::to_string_pretty(&site)?);
                Ok(())
            }
            ConfigAction::Set {
                sitename,
                vpsurl,
                days,
            } => {
                let site = SiteConfig::parse_update(&sitename, &vpsurl, &days)?;
                save_site_config(store.as_ref(), &site).await?;
                println!("Saved settings for {}", site.sitename);
                Ok(())
            }
        },
        Command::Check => {
            let client = init_client(&config).context("Failed to initialize HTTP client")?;
            let pipeline = Pipeline::new(client, store, config);
            match pipeline.run(Trigger::Scheduled).await {
                Ok(report) => {
                    let sent = report
                        .notifications
                        .as_ref()
                        .map(|summary| summary.sent())
                        .unwrap_or(0);
                    println!(
                        "Checked {} VPS entr{} ({} reminder{} sent, {} warning{})",
                        report.records.len(),
                        if report.records.len() == 1 { "y" } else { "ies" },
                        sent,
                        if sent == 1 { "" } else { "s" },
                        report.warnings,
                        if report.warnings == 1 { "" } else { "s" }
                    );
                    Ok(())
                }
                Err(e) => {
                    eprintln!("vps_monitor error: {}\n{}", e, e.user_hint());
                    process::exit(1);
                }
            }
        }
        Command::Serve {
            listen,
            interval_minutes,
        } => {
            let client = init_client(&config).context("Failed to initialize HTTP client")?;
            let pipeline = Arc::new(Pipeline::new(client, store, config));
            let cancel = CancellationToken::new();

            let scheduler = spawn_scheduler(
                Arc::clone(&pipeline),
                Duration::from_secs(interval_minutes * 60),
                cancel.clone(),
            );
            let shutdown = tokio::spawn(shutdown_on_ctrl_c(cancel.clone(), vec![scheduler]));

            let result = serve(listen, AppState { pipeline }, cancel.clone()).await;
            cancel.cancel();
            let _ = shutdown.await;
            result
        }
    }
}
