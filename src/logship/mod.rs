//! Log shipping: buffer formatted log lines in memory and merge them into a
//! single remote text object per process run.
//!
//! - `buffer`: the shared, mutex-protected line buffer
//! - `layer`: a `tracing` layer that formats events into the buffer
//! - `shipper`: the flush routine and its background task

use chrono::{DateTime, Local};
use object_store::{ObjectStore, aws::AmazonS3Builder, local::LocalFileSystem};
use std::sync::Arc;

use crate::app::config::LogStoreConfig;

pub mod buffer;
pub mod layer;
pub mod shipper;

pub use buffer::LogBuffer;
pub use layer::{BufferLayer, SHIPPER_TARGET};
pub use shipper::{FlushTask, LogShipper, LogStore, ShipError};

/// Object key for a run started at `started`.
pub fn run_key(started: DateTime<Local>) -> String {
    format!("logs/app_log_{}.log", started.format("%Y-%m-%d_%H-%M-%S"))
}

/// Build the object store named by the configuration, or `None` when
/// shipping is disabled.
pub fn open_store(config: &LogStoreConfig) -> Result<Option<Arc<dyn ObjectStore>>, ShipError> {
    let store: Arc<dyn ObjectStore> = match config {
        LogStoreConfig::Disabled => return Ok(None),
        // Region and credentials come from the usual AWS_* variables.
        LogStoreConfig::S3 { bucket } => Arc::new(
            AmazonS3Builder::from_env()
                .with_bucket_name(bucket)
                .build()?,
        ),
        LogStoreConfig::Local { dir } => {
            std::fs::create_dir_all(dir)?;
            Arc::new(LocalFileSystem::new_with_prefix(dir)?)
        }
    };
    Ok(Some(store))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn run_key_embeds_start_time() {
        let started = Local.with_ymd_and_hms(2025, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(run_key(started), "logs/app_log_2025-03-09_07-05-01.log");
    }

    #[test]
    fn disabled_config_opens_nothing() {
        assert!(open_store(&LogStoreConfig::Disabled).unwrap().is_none());
    }

    #[test]
    fn local_config_creates_directory() {
        let dir = std::env::temp_dir().join(format!("todo-app-logs-{}", std::process::id()));
        let store = open_store(&LogStoreConfig::Local { dir: dir.clone() }).unwrap();

        assert!(store.is_some());
        assert!(dir.is_dir());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
