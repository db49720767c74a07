//! Trailing-edge debounce between keystrokes and lookups.
//!
//! Every [`DebouncedSearchController::input`] call restarts the quiet period. Once the
//! quiet period elapses with no further input, the most recent value is committed
//! with a fresh sequence number. Disposing of the controller (explicitly or by
//! dropping it) discards whatever was pending.

use std::time::Duration;

use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{Instant, sleep},
};
use tracing::{debug, trace};

pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(300);

/// A query that survived the quiet period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedQuery {
    /// Strictly increasing per controller, the latest commit has the largest value.
    pub sequence: u64,
    pub query: String,
}

pub struct DebouncedSearchController {
    input: mpsc::UnboundedSender<String>,
    task: JoinHandle<()>,
    quiet_period: Duration,
}

impl DebouncedSearchController {
    /// Start a controller on the current Tokio runtime. Committed queries arrive on
    /// the returned receiver, which closes once the controller is disposed.
    pub fn spawn(quiet_period: Duration) -> (Self, mpsc::UnboundedReceiver<CommittedQuery>) {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (commit_tx, commit_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(debounce_loop(quiet_period, input_rx, commit_tx));

        (
            Self {
                input: input_tx,
                task,
                quiet_period,
            },
            commit_rx,
        )
    }

    pub const fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// Record a new input value. Returns `false` once the controller has stopped.
    pub fn input(&self, value: impl Into<String>) -> bool {
        self.input.send(value.into()).is_ok()
    }

    /// Stop without committing anything that is still pending.
    pub fn dispose(self) {
        drop(self);
    }
}

impl Drop for DebouncedSearchController {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn debounce_loop(
    quiet_period: Duration,
    mut input: mpsc::UnboundedReceiver<String>,
    commits: mpsc::UnboundedSender<CommittedQuery>,
) {
    let mut sequence = 0_u64;

    while let Some(mut pending) = input.recv().await {
        trace!(value = %pending, "debounce armed");
        let deadline = sleep(quiet_period);
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                // New input wins a tie with the deadline.
                biased;
                next = input.recv() => match next {
                    Some(value) => {
                        trace!(value = %value, "debounce rescheduled");
                        pending = value;
                        deadline.as_mut().reset(Instant::now() + quiet_period);
                    }
                    None => {
                        debug!(value = %pending, "Debounce disposed with pending input");
                        return;
                    }
                },
                () = &mut deadline => {
                    sequence += 1;
                    debug!(sequence, query = %pending, "Committing query");
                    let commit = CommittedQuery { sequence, query: pending };
                    if commits.send(commit).is_err() {
                        return;
                    }
                    break;
                }
            }
        }
    }
}
