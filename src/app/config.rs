//! Runtime configuration read from the environment.

use std::{net::SocketAddr, path::PathBuf, time::Duration};

const DEFAULT_DATABASE_URL: &str = "sqlite://todo.db";
const DEFAULT_ADDR: &str = "127.0.0.1:8000";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("invalid value for {var}: {value:?}")]
  Invalid { var: &'static str, value: String },
}

/// Where shipped logs go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogStoreConfig {
  Disabled,
  S3 { bucket: String },
  Local { dir: PathBuf },
}

#[derive(Debug, Clone)]
pub struct Config {
  pub database_url: String,
  pub max_connections: u32,
  pub addr: SocketAddr,
  pub log_store: LogStoreConfig,
  pub flush_lines: usize,
  pub flush_interval: Duration,
}

impl Config {
  /// Read configuration from the process environment.
  ///
  /// - `DATABASE_URL` (default `sqlite://todo.db`)
  /// - `TODO_ADDR` (default `127.0.0.1:8000`)
  /// - `TODO_DB_MAX_CONNECTIONS` (default 5)
  /// - `TODO_LOG_BUCKET`: ship logs to this S3 bucket
  /// - `TODO_LOG_DIR`: ship logs to this local directory when no bucket is set
  /// - `TODO_LOG_FLUSH_LINES` (default 5), `TODO_LOG_FLUSH_SECS` (default 10)
  pub fn from_env() -> Result<Self, ConfigError> {
    Self::from_lookup(|name| std::env::var(name).ok())
  }

  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
    let database_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
    let addr = parse(&lookup, "TODO_ADDR", DEFAULT_ADDR.parse().ok())?;
    let max_connections = parse(&lookup, "TODO_DB_MAX_CONNECTIONS", Some(5))?;
    let flush_lines = parse(&lookup, "TODO_LOG_FLUSH_LINES", Some(5))?;
    let flush_secs: u64 = parse(&lookup, "TODO_LOG_FLUSH_SECS", Some(10))?;

    let log_store = match (lookup("TODO_LOG_BUCKET"), lookup("TODO_LOG_DIR")) {
      (Some(bucket), _) if !bucket.is_empty() => LogStoreConfig::S3 { bucket },
      (_, Some(dir)) if !dir.is_empty() => LogStoreConfig::Local {
        dir: PathBuf::from(dir),
      },
      _ => LogStoreConfig::Disabled,
    };

    Ok(Self {
      database_url,
      max_connections,
      addr,
      log_store,
      flush_lines,
      flush_interval: Duration::from_secs(flush_secs.max(1)),
    })
  }
}

fn parse<T: std::str::FromStr>(
  lookup: &impl Fn(&str) -> Option<String>,
  var: &'static str,
  default: Option<T>,
) -> Result<T, ConfigError> {
  match lookup(var) {
    Some(value) => value
      .trim()
      .parse()
      .map_err(|_| ConfigError::Invalid { var, value }),
    None => default.ok_or(ConfigError::Invalid {
      var,
      value: String::new(),
    }),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
    let vars: HashMap<String, String> = vars
      .iter()
      .map(|(k, v)| (k.to_string(), v.to_string()))
      .collect();
    Config::from_lookup(|name| vars.get(name).cloned())
  }

  #[test]
  fn defaults_when_environment_is_empty() {
    let cfg = config(&[]).unwrap();
    assert_eq!(cfg.database_url, "sqlite://todo.db");
    assert_eq!(cfg.addr, "127.0.0.1:8000".parse().unwrap());
    assert_eq!(cfg.max_connections, 5);
    assert_eq!(cfg.log_store, LogStoreConfig::Disabled);
    assert_eq!(cfg.flush_lines, 5);
    assert_eq!(cfg.flush_interval, Duration::from_secs(10));
  }

  #[test]
  fn bucket_wins_over_directory() {
    let cfg = config(&[("TODO_LOG_BUCKET", "todo-logs"), ("TODO_LOG_DIR", "/tmp/logs")]).unwrap();
    assert_eq!(
      cfg.log_store,
      LogStoreConfig::S3 {
        bucket: "todo-logs".into()
      }
    );

    let cfg = config(&[("TODO_LOG_DIR", "/tmp/logs")]).unwrap();
    assert_eq!(
      cfg.log_store,
      LogStoreConfig::Local {
        dir: PathBuf::from("/tmp/logs")
      }
    );
  }

  #[test]
  fn rejects_unparseable_values() {
    let err = config(&[("TODO_LOG_FLUSH_SECS", "soon")]).unwrap_err();
    assert!(err.to_string().contains("TODO_LOG_FLUSH_SECS"));
    assert!(config(&[("TODO_ADDR", "localhost")]).is_err());
  }
}
