use anyhow::{Context, Result};
use clap::Parser;
use core_logic::{setup_logger, ProxyManager, WorkerRunner};
use dialoguer::{theme::ColorfulTheme, Confirm};
use dotenv::dotenv;
use std::sync::Arc;
use tracing::{info, warn};
use xyber_project::client::ReqwestTransport;
use xyber_project::config::XyberConfig;
use xyber_project::scheduler::{CycleState, Scheduler};

#[derive(Parser, Debug)]
#[command(author, version, about = "Xyber auto daily spin", long_about = None)]
struct Args {
    #[arg(short, long, default_value = "chains/xyber/config.toml")]
    config: String,
    /// Use the proxy list without asking
    #[arg(long, conflicts_with = "no_proxy")]
    proxy: bool,
    /// Connect directly without asking
    #[arg(long)]
    no_proxy: bool,
    /// Run a single cycle and exit
    #[arg(long)]
    once: bool,
}

fn ask_use_proxy(args: &Args) -> bool {
    if args.proxy {
        return true;
    }
    if args.no_proxy {
        return false;
    }

    match Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("🔌 Do You Want to Use Proxy?")
        .default(false)
        .interact()
    {
        Ok(answer) => answer,
        Err(_) => {
            warn!("Cannot prompt (not a terminal). Proceeding without proxy.");
            false
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _log_guard = setup_logger();
    dotenv().ok();

    let args = Args::parse();
    info!("✪ BOT XYBER AUTO DAILY SPIN ✪");
    info!("Loading config from: {}", args.config);

    let config = XyberConfig::load(&args.config).context("Failed to load config")?;

    let use_proxy = ask_use_proxy(&args);
    let proxies = if use_proxy {
        ProxyManager::load_proxies(&config.files.proxies).unwrap_or_else(|e| {
            warn!("{:#}", e);
            Vec::new()
        })
    } else {
        info!("Proceeding without proxy.");
        Vec::new()
    };
    let state = CycleState::new(use_proxy, proxies);
    if state.use_proxy() {
        info!("Using {} proxies in rotation.", state.proxy_count());
    }

    let once = args.once;
    WorkerRunner::run(|token| async move {
        let scheduler = Scheduler::new(config, state, Arc::new(ReqwestTransport::new()), token);
        if once {
            scheduler.run_cycle().await;
        } else {
            scheduler.run_forever().await;
        }
        Ok(())
    })
    .await
}
