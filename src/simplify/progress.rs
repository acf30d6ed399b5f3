//! One-shot "still processing" notification for slow calls.

use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, Sleep};

/// Progress signal emitted to the caller while a call is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressEvent {
    /// The call has exceeded the expected latency but has not failed.
    StillProcessing { elapsed: Duration },
}

/// Receiver of progress events.
pub trait ProgressSink: Send + Sync {
    fn notify(&self, event: ProgressEvent);
}

impl ProgressSink for mpsc::UnboundedSender<ProgressEvent> {
    fn notify(&self, event: ProgressEvent) {
        // Receiver gone means nobody is listening anymore.
        let _ = self.send(event);
    }
}

/// Fire-once timer owned by a single call.
///
/// Dropping the timer (call resolved, failed, or cancelled) discards the
/// pending notification.
pub struct ProgressTimer {
    sleep: Pin<Box<Sleep>>,
    started: Instant,
    fired: bool,
    sink: Option<Arc<dyn ProgressSink>>,
}

impl ProgressTimer {
    /// Arm the timer; the threshold counts from now.
    pub fn arm(after: Duration, sink: Option<Arc<dyn ProgressSink>>) -> Self {
        Self {
            sleep: Box::pin(tokio::time::sleep(after)),
            started: Instant::now(),
            fired: false,
            sink,
        }
    }

    pub fn is_armed(&self) -> bool {
        !self.fired
    }

    /// Resolves when the threshold elapses.
    pub async fn expired(&mut self) {
        self.sleep.as_mut().await;
    }

    /// Emit the notification. Subsequent calls are no-ops.
    pub fn fire(&mut self) {
        if self.fired {
            return;
        }
        self.fired = true;
        let elapsed = self.started.elapsed();
        tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "simplify call still processing");
        if let Some(sink) = &self.sink {
            sink.notify(ProgressEvent::StillProcessing { elapsed });
        }
    }
}
