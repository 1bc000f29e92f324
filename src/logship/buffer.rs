//! Shared buffer of formatted log lines.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;

/// Most lines kept pending while the remote store is unreachable.
pub const MAX_PENDING_LINES: usize = 10_000;

/// Cloneable handle to the process's pending log lines.
///
/// Appends come from any thread that emits a log event; draining is done by
/// the shipper. Both go through the same mutex, so a line is either drained
/// by exactly one flush or still pending.
#[derive(Clone)]
pub struct LogBuffer {
    inner: Arc<Inner>,
}

struct Inner {
    lines: Mutex<Vec<String>>,
    flush_at: usize,
    max_pending: usize,
    full: Notify,
}

impl LogBuffer {
    /// `flush_at` is the line count at which the flusher is woken early.
    pub fn new(flush_at: usize) -> Self {
        Self::with_limit(flush_at, MAX_PENDING_LINES)
    }

    /// Like [`new`](Self::new), keeping at most `max_pending` lines after a
    /// failed flush.
    pub fn with_limit(flush_at: usize, max_pending: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                lines: Mutex::new(Vec::new()),
                flush_at: flush_at.max(1),
                max_pending: max_pending.max(1),
                full: Notify::new(),
            }),
        }
    }

    pub fn push(&self, line: String) {
        let len = {
            let mut lines = self.lock();
            lines.push(line);
            lines.len()
        };
        // Only the push that crosses the threshold wakes the flusher. Lines
        // restored after a failed flush wait for the next interval instead of
        // turning every push into another attempt.
        if len == self.inner.flush_at {
            self.inner.full.notify_one();
        }
    }

    /// Take every pending line, leaving the buffer empty.
    pub fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.lock())
    }

    /// Put lines from a failed flush back in front of anything appended since.
    ///
    /// Beyond the pending limit the oldest lines are dropped; returns how many.
    pub fn restore(&self, mut lines: Vec<String>) -> usize {
        if lines.is_empty() {
            return 0;
        }
        let mut pending = self.lock();
        lines.append(&mut pending);
        let excess = lines.len().saturating_sub(self.inner.max_pending);
        lines.drain(..excess);
        *pending = lines;
        excess
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolves once the buffer has reached its flush threshold. A wake-up
    /// that happens while nobody is waiting is kept for the next call.
    pub async fn filled(&self) {
        self.inner.full.notified().await;
    }

    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        // A panic while holding the lock cannot leave the Vec half-written.
        self.inner.lines.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn drain_takes_lines_in_order() {
        let buffer = LogBuffer::new(10);
        buffer.push("a\n".into());
        buffer.push("b\n".into());

        assert_eq!(buffer.drain(), vec!["a\n", "b\n"]);
        assert!(buffer.is_empty());
    }

    #[test]
    fn restore_keeps_failed_lines_first() {
        let buffer = LogBuffer::new(10);
        buffer.push("old\n".into());
        let failed = buffer.drain();
        buffer.push("new\n".into());

        assert_eq!(buffer.restore(failed), 0);

        assert_eq!(buffer.drain(), vec!["old\n", "new\n"]);
    }

    #[test]
    fn restore_drops_oldest_lines_over_limit() {
        let buffer = LogBuffer::with_limit(10, 3);
        for line in ["1\n", "2\n", "3\n"] {
            buffer.push(line.into());
        }
        let failed = buffer.drain();
        buffer.push("4\n".into());
        buffer.push("5\n".into());

        assert_eq!(buffer.restore(failed), 2);
        assert_eq!(buffer.drain(), vec!["3\n", "4\n", "5\n"]);
    }

    #[tokio::test]
    async fn pushes_past_threshold_do_not_wake_again() {
        let buffer = LogBuffer::new(2);
        buffer.push("1\n".into());
        buffer.push("2\n".into());
        buffer.filled().await;

        buffer.push("3\n".into());
        buffer.push("4\n".into());

        let woke = tokio::time::timeout(Duration::from_millis(50), buffer.filled()).await;
        assert!(woke.is_err());
    }

    #[tokio::test]
    async fn reaching_threshold_wakes_waiter() {
        let buffer = LogBuffer::new(2);
        buffer.push("1\n".into());
        buffer.push("2\n".into());

        tokio::time::timeout(Duration::from_secs(1), buffer.filled())
            .await
            .expect("threshold wake-up");
    }

    #[test]
    fn concurrent_pushes_are_not_lost() {
        let buffer = LogBuffer::new(usize::MAX);
        let mut drained = Vec::new();
        std::thread::scope(|s| {
            for t in 0..4 {
                let buffer = buffer.clone();
                s.spawn(move || {
                    for i in 0..250 {
                        buffer.push(format!("{t}-{i}\n"));
                    }
                });
            }
            for _ in 0..50 {
                drained.extend(buffer.drain());
            }
        });
        drained.extend(buffer.drain());

        assert_eq!(drained.len(), 1000);
        drained.sort();
        drained.dedup();
        assert_eq!(drained.len(), 1000);
    }
}
