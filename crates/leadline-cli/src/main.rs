//! `leadline`: command-line client for the leadline staff API.
//!
//! # Usage
//!
//! ```sh
//! leadline --url http://localhost:3000 --user staff@example.com --password secret stats
//! leadline --config ~/.config/leadline/cli.toml list --status PENDING --search doe
//! leadline mark 6f1c…-… REACHED_OUT
//! ```

mod client;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use leadline_core::{
  intake::IntakePayload,
  lead::{LeadPatch, LeadStatus},
  views::StatusFilter,
};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "leadline", about = "Review and triage leads from the command line")]
struct Args {
  /// Path to a TOML config file (url, username, password).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the leadline server (default: http://localhost:3000).
  #[arg(long, env = "LEADLINE_URL")]
  url: Option<String>,

  /// Staff email.
  #[arg(long, env = "LEADLINE_USER")]
  user: Option<String>,

  /// Staff password (plaintext).
  #[arg(long, env = "LEADLINE_PASSWORD")]
  password: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Headline counters.
  Stats,
  /// The most recently submitted leads.
  Recent,
  /// One page of the filtered lead table.
  List {
    #[arg(long, default_value_t = StatusFilter::All)]
    status: StatusFilter,
    #[arg(long, default_value = "")]
    search: String,
    #[arg(long, default_value_t = 1)]
    page:   usize,
  },
  /// Every field of one lead.
  Show { id: Uuid },
  /// Set a lead's status (PENDING or REACHED_OUT).
  Mark { id: Uuid, status: LeadStatus },
  /// Remove a lead.
  Delete { id: Uuid },
  /// Submit an intake form from a JSON file, as the public form would.
  Submit { payload: PathBuf },
  /// Show who the credentials belong to.
  Whoami,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:      String,
  #[serde(default)]
  username: String,
  #[serde(default)]
  password: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| "http://localhost:3000".to_string()),
    username: args
      .user
      .or_else(|| (!file_cfg.username.is_empty()).then(|| file_cfg.username.clone()))
      .unwrap_or_default(),
    password: args
      .password
      .or_else(|| (!file_cfg.password.is_empty()).then(|| file_cfg.password.clone()))
      .unwrap_or_default(),
  };
  tracing::debug!(url = %api_config.base_url, "connecting");

  let client = ApiClient::new(api_config)?;
  run(&client, args.command).await
}

async fn run(client: &ApiClient, command: Command) -> Result<()> {
  match command {
    Command::Stats => print!("{}", render::stats(&client.stats().await?)),
    Command::Recent => print!("{}", render::recent(&client.recent().await?)),
    Command::List {
      status,
      search,
      page,
    } => {
      let page = client.table(status, &search, page).await?;
      print!("{}", render::table(&page));
    }
    Command::Show { id } => print!("{}", render::detail(&client.get_lead(id).await?)),
    Command::Mark { id, status } => {
      let applied = client.update_lead(id, &LeadPatch::status(status)).await?;
      println!(
        "{} is now {}",
        applied.value.full_name(),
        applied.value.status.label()
      );
      warn_unsaved(applied.warning);
    }
    Command::Delete { id } => {
      let applied = client.delete_lead(id).await?;
      println!("deleted {id}");
      warn_unsaved(applied.warning);
    }
    Command::Submit { payload } => {
      let raw = std::fs::read_to_string(&payload)
        .with_context(|| format!("reading {}", payload.display()))?;
      let payload: IntakePayload =
        serde_json::from_str(&raw).context("parsing intake payload")?;
      let lead = client.submit(&payload).await?;
      println!("created {} ({})", lead.id, lead.full_name());
    }
    Command::Whoami => {
      let identity = client.session().await?;
      println!("{}", serde_json::to_string_pretty(&identity)?);
    }
  }
  Ok(())
}

/// The server applied the change but could not save it.
fn warn_unsaved(warning: Option<String>) {
  if let Some(w) = warning {
    eprintln!("warning: {w}");
  }
}
