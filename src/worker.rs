use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};

use crate::data::filter::RuleSet;
use crate::error::CleanError;
use crate::pipeline::{self, CleanOptions, RunSummary};
use crate::progress::{ChannelObserver, ProgressEvent};

// ---------------------------------------------------------------------------
// Background run: pipeline on a worker thread, messages back to the caller
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct CleanRequest {
    pub input: PathBuf,
    pub rules: RuleSet,
    pub options: CleanOptions,
}

#[derive(Debug)]
pub enum WorkerMessage {
    Progress(ProgressEvent),
    /// Always the last message of a run.
    Finished(Result<RunSummary, CleanError>),
}

impl From<ProgressEvent> for WorkerMessage {
    fn from(event: ProgressEvent) -> Self {
        WorkerMessage::Progress(event)
    }
}

/// A running job. Drain `messages` from the caller's own thread.
pub struct WorkerHandle {
    pub messages: Receiver<WorkerMessage>,
    thread: JoinHandle<()>,
    input: PathBuf,
}

impl WorkerHandle {
    /// Block until the run finishes, handing each progress event to
    /// `on_progress` on the calling thread.
    pub fn wait(
        self,
        mut on_progress: impl FnMut(&ProgressEvent),
    ) -> Result<RunSummary, CleanError> {
        let mut outcome = None;
        for msg in self.messages.iter() {
            match msg {
                WorkerMessage::Progress(event) => on_progress(&event),
                WorkerMessage::Finished(result) => outcome = Some(result),
            }
        }
        if self.thread.join().is_err() {
            log::error!("cleaning worker for {} panicked", self.input.display());
        }
        outcome.unwrap_or(Err(CleanError::WorkerCrashed { path: self.input }))
    }
}

pub fn spawn(request: CleanRequest) -> WorkerHandle {
    let (tx, rx) = mpsc::channel();
    let input = request.input.clone();
    let thread = thread::spawn(move || {
        let mut observer = ChannelObserver::new(tx.clone());
        let result = pipeline::run(
            &request.input,
            &request.rules,
            request.options,
            &mut observer,
        );
        let _ = tx.send(WorkerMessage::Finished(result));
    });
    WorkerHandle {
        messages: rx,
        thread,
        input,
    }
}
