use std::sync::mpsc::Sender;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Progress checkpoints
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Load,
    Validate,
    RuleEvaluated,
    Filter,
    Save,
    Done,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressEvent {
    pub stage: Stage,
    pub detail: String,
    /// Rough percentage (0-100) for display only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent: Option<u8>,
}

impl ProgressEvent {
    pub fn new(stage: Stage, detail: impl Into<String>) -> Self {
        Self {
            stage,
            detail: detail.into(),
            percent: None,
        }
    }

    pub fn with_percent(mut self, percent: u8) -> Self {
        self.percent = Some(percent.min(100));
        self
    }
}

/// Receives progress events synchronously from the thread doing the work.
///
/// Implementations that touch caller-owned state must forward the event
/// (see [`ChannelObserver`]) rather than mutate that state directly.
pub trait ProgressObserver {
    fn on_progress(&mut self, event: ProgressEvent);
}

/// Discards every event.
#[derive(Debug, Default)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {
    fn on_progress(&mut self, _event: ProgressEvent) {}
}

/// Writes every event to the `log` facade at debug level.
#[derive(Debug, Default)]
pub struct LogObserver;

impl ProgressObserver for LogObserver {
    fn on_progress(&mut self, event: ProgressEvent) {
        log::debug!("[{:?}] {}", event.stage, event.detail);
    }
}

/// Forwards events into an mpsc channel. A closed receiver is ignored.
#[derive(Debug)]
pub struct ChannelObserver<T> {
    tx: Sender<T>,
}

impl<T> ChannelObserver<T> {
    pub fn new(tx: Sender<T>) -> Self {
        Self { tx }
    }
}

impl<T: From<ProgressEvent>> ProgressObserver for ChannelObserver<T> {
    fn on_progress(&mut self, event: ProgressEvent) {
        let _ = self.tx.send(T::from(event));
    }
}

/// Collects events in memory.
impl ProgressObserver for Vec<ProgressEvent> {
    fn on_progress(&mut self, event: ProgressEvent) {
        self.push(event);
    }
}
