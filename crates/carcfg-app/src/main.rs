//! Car Configurator entry point.
//!
//! Wires together the settings file, the key-value store, the clipboard and
//! the headless viewer, then runs one of three subcommands.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  ├─ load settings (TOML)           -- --config or platform default
//!  ├─ init tracing                   -- RUST_LOG, else settings log_level
//!  └─ subcommand
//!       ├─ run     AppState::new → restore --url → mount viewer → stdin loop
//!       ├─ share   build a configuration from flags → print share URL
//!       └─ decode  share URL → configuration JSON on stdout
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use carcfg_app::infrastructure::{
    clipboard::CommandClipboard,
    console::{self, ConsoleCommand},
    render::headless::HeadlessProvider,
    storage::{
        config::{load_config, load_config_from, store_file_path, AppConfig},
        FileKeyValueStore,
    },
    ui_bridge::{self, AppState, Ports},
};
use carcfg_core::{
    decode_token, share_url, token_from_url, AccessoryId, AccessorySet, CarConfiguration, ColorId,
    PageLocation,
};

// ── CLI ───────────────────────────────────────────────────────────────────────

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "carcfg", about = "Configure, save and share a car build", version)]
struct Cli {
    /// Settings file to use instead of the platform default.
    #[arg(long, global = true, env = "CARCFG_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive session reading commands from stdin.
    Run {
        /// Share URL to restore the configuration from at startup.
        #[arg(long)]
        url: Option<String>,
    },
    /// Print a share URL for a configuration given on the command line.
    Share {
        /// Paint color id.
        #[arg(long)]
        color: Option<String>,
        /// Accessory id; repeat for several.
        #[arg(long = "accessory")]
        accessories: Vec<String>,
    },
    /// Print the configuration encoded in a share URL as JSON.
    Decode {
        /// Share URL containing a `config` parameter.
        url: String,
    },
}

impl Cli {
    fn load_settings(&self) -> anyhow::Result<AppConfig> {
        match &self.config {
            Some(path) => load_config_from(path)
                .with_context(|| format!("failed to load settings from {}", path.display())),
            None => load_config().context("failed to load settings"),
        }
    }
}

// ── Subcommands ───────────────────────────────────────────────────────────────

async fn run(settings: AppConfig, url: Option<String>) -> anyhow::Result<()> {
    let store_path = store_file_path(&settings.storage).context("cannot locate the store file")?;
    info!("using store {}", store_path.display());

    let ports = Ports {
        store: Arc::new(FileKeyValueStore::new(store_path)),
        clipboard: Arc::new(CommandClipboard::new(settings.clipboard.command.clone())),
        surfaces: Arc::new(HeadlessProvider::new()),
    };
    let state = AppState::new(settings, ports).context("invalid base_url in settings")?;

    if let Some(url) = url {
        let restored = ui_bridge::restore_from_url(Arc::clone(&state), url).await;
        if restored.data != Some(true) {
            warn!("share link could not be restored; starting from the default configuration");
        }
    }

    let mounted = ui_bridge::mount_viewer(Arc::clone(&state)).await;
    if let Some(e) = mounted.error {
        anyhow::bail!("failed to mount viewer: {e}");
    }

    println!("{}", console::execute(&state, ConsoleCommand::Show).await);
    println!("type 'help' for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("failed to read stdin")?,
            _ = tokio::signal::ctrl_c() => {
                info!("received Ctrl+C");
                break;
            }
        };
        let Some(line) = line else {
            break;
        };

        match ConsoleCommand::parse(&line) {
            Ok(None) => {}
            Ok(Some(ConsoleCommand::Quit)) => break,
            Ok(Some(command)) => println!("{}", console::execute(&state, command).await),
            Err(e) => println!("{e}"),
        }
    }

    ui_bridge::unmount_viewer(state).await;
    Ok(())
}

/// Builds the configuration described by `share`'s flags.  Repeated
/// `--accessory` ids count once.
fn configuration_from_flags(
    color: Option<String>,
    accessories: Vec<String>,
) -> anyhow::Result<CarConfiguration> {
    let mut config = CarConfiguration {
        accessories: accessories.into_iter().map(AccessoryId::from).collect::<AccessorySet>(),
        ..CarConfiguration::default()
    };
    if let Some(color) = color {
        config = config.with_color(color.parse::<ColorId>().context("invalid --color")?);
    }
    Ok(config)
}

fn share(settings: &AppConfig, color: Option<String>, accessories: Vec<String>) -> anyhow::Result<()> {
    let config = configuration_from_flags(color, accessories)?;
    let location = PageLocation::parse(&settings.app.base_url).context("invalid base_url in settings")?;
    println!("{}", share_url(&location, &config)?);
    Ok(())
}

fn decode(url: &str) -> anyhow::Result<()> {
    let token = token_from_url(url)
        .context("not a valid URL")?
        .context("URL has no config parameter")?;
    let config = decode_token(&token).context("config parameter is not a valid share token")?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = cli.load_settings()?;

    // `RUST_LOG` wins; otherwise the settings file decides.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.app.log_level)),
        )
        .init();

    match cli.command {
        Command::Run { url } => run(settings, url).await,
        Command::Share { color, accessories } => share(&settings, color, accessories),
        Command::Decode { url } => decode(&url),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
