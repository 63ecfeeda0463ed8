// src/main.rs
use std::path::Path;

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;

use lockkey::cli::{self, AppContext, Args, CliCommand};
use lockkey::core::config::Config;
use lockkey::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    if Path::new(".env").exists() {
        dotenvy::dotenv().ok();
    }

    let args = Args::parse();

    let mut config = Config::load();
    if let Some(dir) = &args.data_dir {
        config.data_dir = dir.clone();
    }
    if args.verbose {
        config.log_level = LevelFilter::Debug;
    }
    if args.no_sync {
        config.sync_enabled = false;
    }

    config.ensure_directories_exist();
    logging::init(config.log_level, config.log_file.as_ref())
        .context("Failed to initialize logging")?;

    log::info!("🔑 Starting LockKey");
    log::debug!("Loaded config: {:?}", config);

    ctrlc::set_handler(move || {
        log::info!("🔴 Ctrl+C received. Shutting down...");
        println!("\n👋 Goodbye!");
        std::process::exit(0);
    })
    .context("Failed to set Ctrl+C handler")?;

    let ctx = AppContext::build(config).map_err(|e| anyhow::anyhow!("{}", e))?;

    let command = args.command.unwrap_or(CliCommand::Menu);
    let result = cli::run(&ctx, command, args.json).await;

    // Let pending cloud pushes finish before the runtime goes away
    ctx.store.wait_for_sync().await;

    if let Err(e) = result {
        log::error!("{}", e);
        return Err(anyhow::anyhow!("{}", e));
    }

    log::info!("✅ LockKey shutdown complete.");
    Ok(())
}
