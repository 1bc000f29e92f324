//! Application setup and runtime.

pub mod config;

use crate::{
  db::{self, TodoStore},
  http,
  logship::{self, LogBuffer, LogShipper, ShipError},
};
use chrono::Local;
use self::config::{Config, ConfigError};
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use std::sync::Arc;
use tracing::{error, info};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
  pub store: TodoStore,
}

impl AppState {
  pub fn new(pool: SqlitePool) -> Self {
    Self {
      store: TodoStore::new(pool),
    }
  }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
  #[error(transparent)]
  Config(#[from] ConfigError),
  #[error("database: {0}")]
  Database(#[from] sqlx::Error),
  #[error("log storage: {0}")]
  LogStore(#[from] ShipError),
  #[error(transparent)]
  Io(#[from] std::io::Error),
}

/// Start the HTTP server and, when configured, the log shipper.
pub async fn run() -> Result<(), AppError> {
  let config = Config::from_env()?;

  let shipper = match logship::open_store(&config.log_store)? {
    Some(store) => Some(Arc::new(LogShipper::new(
      LogBuffer::new(config.flush_lines),
      store,
      logship::run_key(Local::now()),
    ))),
    None => None,
  };
  crate::util::init_tracing(shipper.as_ref().map(|s| s.buffer().clone()));
  match &shipper {
    Some(s) => info!("shipping logs to {} ({:?})", s.key(), config.log_store),
    None => info!("log shipping disabled"),
  }

  let db_url = db::ensure_sqlite_path(&config.database_url);
  let pool = SqlitePoolOptions::new()
    .max_connections(config.max_connections)
    .connect(&db_url)
    .await?;
  db::run_migrations(&pool).await?;

  let app = http::build_router(AppState::new(pool));
  let flusher = shipper.map(|s| s.spawn(config.flush_interval));

  let listener = tokio::net::TcpListener::bind(config.addr).await?;
  info!("todo app:      http://{}/", config.addr);
  info!("todo API:      http://{}/api/todos/", config.addr);

  let served = axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await;

  if let Some(flusher) = flusher {
    flusher.shutdown().await;
  }
  served?;
  info!("server shut down");
  Ok(())
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
  let ctrl_c = async {
    if let Err(e) = tokio::signal::ctrl_c().await {
      error!("failed to install Ctrl+C handler: {e}");
      std::future::pending::<()>().await;
    }
  };

  #[cfg(unix)]
  let terminate = async {
    use tokio::signal::unix::{SignalKind, signal};
    match signal(SignalKind::terminate()) {
      Ok(mut sigterm) => {
        sigterm.recv().await;
      }
      Err(e) => {
        error!("failed to install SIGTERM handler: {e}");
        std::future::pending::<()>().await;
      }
    }
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    _ = ctrl_c => info!("received Ctrl+C, shutting down"),
    _ = terminate => info!("received SIGTERM, shutting down"),
  }
}
