//! Flushing buffered lines to remote storage.

use object_store::{ObjectStore, PutPayload, path::Path};
use std::{future::Future, sync::Arc, time::Duration};
use tokio::{
    sync::oneshot,
    task::JoinHandle,
    time::{MissedTickBehavior, interval},
};
use tracing::{debug, warn};

use super::{LogBuffer, SHIPPER_TARGET};

#[derive(Debug, thiserror::Error)]
pub enum ShipError {
    #[error("object store error: {0}")]
    Store(#[from] object_store::Error),
    #[error("remote log is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Remote text blobs addressed by key.
pub trait LogStore: Send + Sync + 'static {
    /// Current contents of `key`, or an empty string if it does not exist.
    fn fetch(&self, key: &str) -> impl Future<Output = Result<String, ShipError>> + Send;

    /// Replace the contents of `key`.
    fn store(&self, key: &str, contents: String)
    -> impl Future<Output = Result<(), ShipError>> + Send;
}

impl LogStore for Arc<dyn ObjectStore> {
    async fn fetch(&self, key: &str) -> Result<String, ShipError> {
        match self.get(&Path::from(key)).await {
            Ok(object) => {
                let bytes = object.bytes().await?;
                Ok(String::from_utf8(bytes.to_vec())?)
            }
            Err(object_store::Error::NotFound { .. }) => Ok(String::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn store(&self, key: &str, contents: String) -> Result<(), ShipError> {
        self.put(&Path::from(key), PutPayload::from(contents.into_bytes()))
            .await?;
        Ok(())
    }
}

/// Owns the buffer, the remote store and the run's object key.
///
/// Appending to the remote object is a fetch, concatenate and put with no
/// concurrency check. Within a process only the flush task (see [`spawn`])
/// calls [`flush`], so flushes never overlap; two processes writing the same
/// key would overwrite each other.
///
/// [`spawn`]: LogShipper::spawn
/// [`flush`]: LogShipper::flush
pub struct LogShipper<S> {
    buffer: LogBuffer,
    store: S,
    key: String,
}

impl<S: LogStore> LogShipper<S> {
    pub fn new(buffer: LogBuffer, store: S, key: String) -> Self {
        Self { buffer, store, key }
    }

    pub fn buffer(&self) -> &LogBuffer {
        &self.buffer
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Merge pending lines into the remote object.
    ///
    /// Never fails: on error the lines go back into the buffer for the next
    /// flush (oldest dropped past the pending limit) and the failure is
    /// reported on the console.
    pub async fn flush(&self) {
        let lines = self.buffer.drain();
        if lines.is_empty() {
            return;
        }
        match self.append(&lines).await {
            Ok(()) => debug!(target: SHIPPER_TARGET, key = %self.key, lines = lines.len(), "shipped log lines"),
            Err(e) => {
                warn!(target: SHIPPER_TARGET, key = %self.key, "Failed to push logs: {e}");
                let dropped = self.buffer.restore(lines);
                if dropped > 0 {
                    warn!(target: SHIPPER_TARGET, dropped, "log buffer full, dropped oldest lines");
                }
            }
        }
    }

    async fn append(&self, lines: &[String]) -> Result<(), ShipError> {
        let mut contents = self.store.fetch(&self.key).await?;
        for line in lines {
            contents.push_str(line);
        }
        self.store.store(&self.key, contents).await
    }

    /// Start the flush task: flush when the buffer reaches its threshold or
    /// `every` elapses, whichever comes first, and once more on shutdown.
    pub fn spawn(self: Arc<Self>, every: Duration) -> FlushTask {
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            let mut ticker = interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {}
                    _ = self.buffer.filled() => {}
                }
                self.flush().await;
            }
            self.flush().await;
        });
        FlushTask {
            stop: stop_tx,
            handle,
        }
    }
}

/// Handle to a running flush task.
pub struct FlushTask {
    stop: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

impl FlushTask {
    /// Stop the task after a final flush.
    pub async fn shutdown(self) {
        let _ = self.stop.send(());
        if let Err(e) = self.handle.await {
            warn!(target: SHIPPER_TARGET, "log flush task failed: {e}");
        }
    }
}
