//! Folio server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`) overlaid by
//! `FOLIO_*` environment variables, opens the SQLite store, and serves the
//! site over HTTP until Ctrl-C.
//!
//! # Password hash generation
//!
//! To generate the argon2 PHC string for `admin_password_hash`:
//!
//! ```
//! cargo run -p folio-web --bin folio -- --hash-password
//! ```
//!
//! # Sample content
//!
//! `folio --seed` inserts sample projects, experience, skills and settings,
//! skipping anything already present, then exits.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use clap::Parser;
use folio_store_sqlite::SqliteStore;
use folio_web::{
  AppState, DEFAULT_NOTIFY_TIMEOUT, ServerConfig,
  auth::AuthConfig,
  mail::{DisabledNotifier, MailConfig, Notifier, SmtpNotifier},
};
use rand_core::OsRng;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Folio portfolio server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Print the argon2 hash for a password entered on stdin and exit.
  #[arg(long)]
  hash_password: bool,

  /// Insert sample content into the configured store and exit.
  #[arg(long, conflicts_with = "hash_password")]
  seed: bool,
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
    .add_source(
      config::Environment::with_prefix("FOLIO")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true),
    )
    .build()
    .context("failed to read configuration")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  if cli.seed {
    store.seed().await.context("seeding failed")?;
    store.close().await.context("failed to close store")?;
    return Ok(());
  }

  anyhow::ensure!(
    !server_cfg.admin_username.is_empty() && !server_cfg.admin_password_hash.is_empty(),
    "admin_username and admin_password_hash must be configured"
  );

  let notifier: Arc<dyn Notifier> = match &server_cfg.mail {
    Some(mail) => Arc::new(SmtpNotifier::new(mail).context("invalid mail configuration")?),
    None => {
      tracing::warn!("no mail section configured; contact notifications are disabled");
      Arc::new(DisabledNotifier)
    }
  };
  let notify_timeout = server_cfg
    .mail
    .as_ref()
    .map_or(DEFAULT_NOTIFY_TIMEOUT, MailConfig::timeout);

  let store = Arc::new(store);
  let state = AppState {
    store: store.clone(),
    auth: Arc::new(AuthConfig {
      username:      server_cfg.admin_username.clone(),
      password_hash: server_cfg.admin_password_hash.clone(),
    }),
    notifier,
    notify_timeout,
  };

  let app = folio_web::router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  tracing::info!("shutting down");
  match Arc::try_unwrap(store) {
    Ok(store) => store.close().await.context("failed to close store")?,
    Err(_) => tracing::warn!("store still shared at shutdown; leaving it to drop"),
  }

  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(error = %e, "failed to listen for Ctrl-C");
    std::future::pending::<()>().await;
  }
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
