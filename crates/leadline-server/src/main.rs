//! leadline-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite lead store, and serves the intake and staff API over HTTP.
//!
//! # Password hash generation
//!
//! To generate the argon2 PHC string for `auth_password_hash` in config.toml:
//!
//! ```sh
//! cargo run -p leadline-server -- --hash-password
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use clap::Parser;
use leadline_core::{demo, repository::LeadRepository};
use leadline_server::{AppState, ServerConfig};
use leadline_store_sqlite::SqliteStore;
use rand_core::OsRng;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Leadline intake and review server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Helper mode: hash a password and exit.
  if cli.hash_password {
    let password = read_password()?;
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .map_err(|e| anyhow::anyhow!("argon2 error: {e}"))?
      .to_string();
    println!("{hash}");
    return Ok(());
  }

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("LEADLINE"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?
    .with_slot(&server_cfg.slot);

  let repo = Arc::new(LeadRepository::open(store).await);
  let initial = repo.snapshot();
  match &initial.error {
    None => tracing::info!(count = initial.items.len(), slot = %server_cfg.slot, "leads loaded"),
    Some(e) => tracing::warn!(error = %e, slot = %server_cfg.slot, "starting with an empty collection"),
  }

  if server_cfg.seed_demo_leads {
    let seeded = repo.seed_if_empty(demo::sample_leads()).await;
    if seeded.value > 0 {
      tracing::info!(count = seeded.value, durable = seeded.is_durable(), "seeded demo leads");
    }
  }

  spawn_change_log(&repo);

  let state = AppState {
    repo,
    auth: Arc::new(server_cfg.verifier()),
  };

  let app = leadline_server::router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Log every change to the lead collection.
fn spawn_change_log(repo: &Arc<LeadRepository<SqliteStore>>) {
  let mut changes = repo.subscribe();
  tokio::spawn(async move {
    while changes.changed().await.is_ok() {
      let (count, error) = {
        let state = changes.borrow_and_update();
        (state.items.len(), state.error.clone())
      };
      match error {
        None => tracing::debug!(count, "lead collection changed"),
        Some(e) => tracing::warn!(count, error = %e, "lead collection changed"),
      }
    }
  });
}

/// Read a password from stdin.
fn read_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  let stdin = io::stdin();
  print!("Password: ");
  io::stdout().flush().ok();
  let mut line = String::new();
  stdin.lock().read_line(&mut line)?;
  Ok(
    line
      .trim_end_matches('\n')
      .trim_end_matches('\r')
      .to_string(),
  )
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
