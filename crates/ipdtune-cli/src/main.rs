//! ipdtune - set a mixed-reality headset's interpupillary distance through
//! its device portal.
//!
//! The portal is asked for a CSRF token once, then each value is posted to
//! the IPD settings endpoint. While an update is outstanding further values
//! are dropped, so a fast stream of slider positions never piles up.

use std::io;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use ipdtune_core::ipd::{MAX_IPD_MM, MIN_IPD_MM, SLIDER_MAX, SLIDER_MIN};
use ipdtune_core::{ApiError, Config, Credentials, DeviceClient, IpdController, IpdUpdater, ScaledIpd};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "ipdtune", version, about = "Adjust headset IPD via the device portal")]
struct Cli {
    /// Device portal URL (a bare host means https://<host>)
    #[arg(long, env = "IPDTUNE_URL", global = true)]
    url: Option<String>,

    /// Device portal username
    #[arg(long, env = "IPDTUNE_USERNAME", global = true)]
    username: Option<String>,

    /// Device portal password (prompted for when absent)
    #[arg(long, env = "IPDTUNE_PASSWORD", hide_env_values = true, global = true)]
    password: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Accept the portal's self-signed certificate (`--insecure=false` turns it off again)
    #[arg(
        long,
        global = true,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    insecure: Option<bool>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Set the IPD in millimeters (50-80)
    Set { mm: f32 },
    /// Apply a slider position (0-30, mapped onto 50-80 mm)
    Slide { value: f32 },
    /// Read slider positions from stdin, one per line
    Watch {
        /// Slider position shown before the first update
        #[arg(long, default_value_t = 0.0)]
        initial: f32,
    },
    /// Save URL, username and transport settings for later runs
    Configure,
}

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing();

    let mut config = Config::load().context("Failed to load config")?;
    merge_cli(&mut config, &cli);

    match cli.command {
        Command::Configure => configure(&config),
        Command::Set { mm } => {
            let ipd = ScaledIpd::checked_from_millimeters(mm).with_context(|| {
                format!("IPD must be between {} and {} mm", MIN_IPD_MM, MAX_IPD_MM)
            })?;
            let controller = connect(&config, cli.password, ipd.millimeters() - MIN_IPD_MM).await?;
            let result = controller.apply(ipd).await;
            render(&controller);
            result?;
            Ok(())
        }
        Command::Slide { value } => {
            check_slider(value)?;
            let controller = connect(&config, cli.password, value).await?;
            let result = controller.on_slider_changed(value).await;
            render(&controller);
            result?;
            Ok(())
        }
        Command::Watch { initial } => {
            check_slider(initial)?;
            let controller = connect(&config, cli.password, initial).await?;
            watch(Arc::new(controller)).await
        }
    }
}

fn merge_cli(config: &mut Config, cli: &Cli) {
    if let Some(ref url) = cli.url {
        config.base_url = Some(url.clone());
    }
    if let Some(ref username) = cli.username {
        config.username = Some(username.clone());
    }
    if cli.timeout.is_some() {
        config.request_timeout_secs = cli.timeout;
    }
    if let Some(insecure) = cli.insecure {
        config.accept_invalid_certs = insecure;
    }
}

fn configure(config: &Config) -> Result<()> {
    if config.base_url.is_none() {
        bail!("Nothing to save: pass at least --url");
    }
    config.save().context("Failed to save config")?;
    println!("Saved configuration to {}", Config::config_path()?.display());
    Ok(())
}

fn check_slider(value: f32) -> Result<()> {
    if ScaledIpd::checked_from_slider(value).is_none() {
        bail!("Slider value must be between {} and {}", SLIDER_MIN, SLIDER_MAX);
    }
    Ok(())
}

/// Build the client, authenticate once, and report the outcome.
async fn connect(config: &Config, password: Option<String>, slider: f32) -> Result<IpdController> {
    let Some(ref url) = config.base_url else {
        bail!("No device URL configured; pass --url or run `ipdtune configure --url <URL>`");
    };
    let username = config.username.clone().unwrap_or_default();
    let password = match password {
        Some(p) => p,
        None => rpassword::prompt_password("Device portal password: ")
            .context("Failed to read password")?,
    };

    let client = DeviceClient::new(url, Credentials::new(username, password), config.client_options())?;
    info!(url = %client.base_url(), "Connecting to device portal");

    let controller = IpdController::new(Arc::new(IpdUpdater::new(client)));
    let result = controller.start(slider).await;
    render(&controller);
    result.context("Authentication failed")?;
    Ok(controller)
}

fn render(controller: &IpdController) {
    let display = controller.display();
    println!("{}  [IPD {} mm]", display.status, display.ipd_label);
}

/// Feed stdin lines to the controller without waiting for each update.
async fn watch(controller: Arc<IpdController>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut tasks = JoinSet::new();

    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let value = match line.parse::<f32>() {
            Ok(v) if ScaledIpd::checked_from_slider(v).is_some() => v,
            _ => {
                warn!(input = line, "Ignoring invalid slider value");
                continue;
            }
        };

        let controller = controller.clone();
        tasks.spawn(async move {
            match controller.on_slider_changed(value).await {
                Err(ApiError::Busy) => {}
                _ => render(&controller),
            }
        });

        while tasks.try_join_next().is_some() {}
    }

    while tasks.join_next().await.is_some() {}
    Ok(())
}
