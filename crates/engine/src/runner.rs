// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cancellable job runner.
//!
//! Runs an ordered list of operations on one dedicated worker thread:
//!
//! ```text
//! Created -> Running -> Finished | Cancelled | Faulted
//! ```
//!
//! Cancellation is cooperative and only observed between operations. The
//! first failing (or panicking) operation stops the run; its error chain is
//! written to the log sink and the runner ends `Faulted`. Failures are never
//! returned to the thread that started the runner.

use std::any::Any;
use std::error::Error as StdError;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use cfb_core::RunId;
use parking_lot::{Condvar, Mutex};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::sink::LogSink;

/// Error type operations report failures with.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// One unit of work executed by a runner.
pub type Operation = Box<dyn FnOnce() -> Result<(), BoxError> + Send + 'static>;

type Continuation = Box<dyn FnOnce(RunnerState) + Send + 'static>;

/// Lifecycle state of a runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunnerState {
    /// Built but not started
    Created,
    /// Worker thread is executing operations
    Running,
    /// Every operation completed
    Finished,
    /// Stopped at an operation boundary after a cancel request
    Cancelled,
    /// An operation failed; later operations were skipped
    Faulted,
}

impl RunnerState {
    pub fn is_terminal(self) -> bool {
        matches!(self, RunnerState::Finished | RunnerState::Cancelled | RunnerState::Faulted)
    }
}

cfb_core::simple_display! {
    RunnerState {
        Created => "created",
        Running => "running",
        Finished => "finished",
        Cancelled => "cancelled",
        Faulted => "faulted",
    }
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("job runner label must not be empty")]
    EmptyLabel,

    #[error("failed to spawn worker thread for {label}: {source}")]
    Spawn {
        label: String,
        #[source]
        source: std::io::Error,
    },

    #[error("a completion continuation is already registered")]
    ContinuationRegistered,
}

enum Slot {
    Vacant,
    Registered(Continuation),
    Fired,
}

struct Status {
    state: RunnerState,
    fault: Option<String>,
    continuation: Slot,
}

struct Shared {
    id: RunId,
    label: String,
    sink: Arc<dyn LogSink>,
    cancel_requested: AtomicBool,
    status: Mutex<Status>,
    changed: Condvar,
    watch: watch::Sender<RunnerState>,
}

impl Shared {
    fn log(&self, line: &str) {
        self.sink.write_line(&format!("[{}] {}", self.label, line));
    }

    fn set_running(&self) {
        let mut status = self.status.lock();
        status.state = RunnerState::Running;
        self.watch.send_replace(RunnerState::Running);
    }

    /// Publish a terminal state, then fire the continuation outside the lock.
    ///
    /// Every observer (`state()`, `wait_timeout`, `completed`) sees the
    /// terminal state before the continuation can run.
    fn complete(&self, state: RunnerState, fault: Option<String>) {
        let continuation = {
            let mut status = self.status.lock();
            status.state = state;
            status.fault = fault;
            self.watch.send_replace(state);
            self.changed.notify_all();
            match std::mem::replace(&mut status.continuation, Slot::Fired) {
                Slot::Registered(f) => Some(f),
                Slot::Vacant => {
                    status.continuation = Slot::Vacant;
                    None
                }
                Slot::Fired => None,
            }
        };

        if let Some(f) = continuation {
            f(state);
        }
    }

    fn run(&self, operations: Vec<Operation>) {
        let total = operations.len();
        info!(run_id = %self.id, label = %self.label, operations = total, "job started");
        self.log(&format!("Starting job ({} operation(s))", total));

        for (index, operation) in operations.into_iter().enumerate() {
            let step = index + 1;
            if self.cancel_requested.load(Ordering::Acquire) {
                info!(run_id = %self.id, label = %self.label, step, "job cancelled");
                self.log(&format!("Job cancelled before operation {} of {}", step, total));
                self.complete(RunnerState::Cancelled, None);
                return;
            }

            debug!(run_id = %self.id, label = %self.label, step, "running operation");
            let detail = match panic::catch_unwind(AssertUnwindSafe(operation)) {
                Ok(Ok(())) => continue,
                Ok(Err(err)) => describe_error(err.as_ref()),
                Err(payload) => format!("panicked: {}", describe_panic(payload.as_ref())),
            };

            error!(
                run_id = %self.id,
                label = %self.label,
                step,
                error = %detail,
                "operation failed"
            );
            self.log(&format!("Error executing operation {} of {}: {}", step, total, detail));
            self.complete(RunnerState::Faulted, Some(detail));
            return;
        }

        info!(run_id = %self.id, label = %self.label, "job finished");
        self.log("Job finished");
        self.complete(RunnerState::Finished, None);
    }
}

/// Render an error with its whole `source()` chain.
pub fn describe_error(err: &(dyn StdError + 'static)) -> String {
    let mut detail = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        detail.push_str("\n  caused by: ");
        detail.push_str(&cause.to_string());
        source = cause.source();
    }
    detail
}

fn describe_panic(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "<non-string panic payload>".to_string()
    }
}

/// A runner that has not been started yet.
///
/// Take a [`JobHandle`] with [`handle`](Self::handle) before starting when an
/// operation needs to observe or cancel its own runner.
pub struct JobRunner {
    handle: JobHandle,
}

impl JobRunner {
    pub fn new(label: impl Into<String>, sink: Arc<dyn LogSink>) -> Result<Self, RunnerError> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(RunnerError::EmptyLabel);
        }
        let (watch, _) = watch::channel(RunnerState::Created);
        let shared = Shared {
            id: RunId::new(),
            label,
            sink,
            cancel_requested: AtomicBool::new(false),
            status: Mutex::new(Status {
                state: RunnerState::Created,
                fault: None,
                continuation: Slot::Vacant,
            }),
            changed: Condvar::new(),
            watch,
        };
        Ok(Self { handle: JobHandle { shared: Arc::new(shared) } })
    }

    /// Build and start a runner in one step.
    pub fn spawn(
        label: impl Into<String>,
        operations: Vec<Operation>,
        sink: Arc<dyn LogSink>,
    ) -> Result<JobHandle, RunnerError> {
        Self::new(label, sink)?.start(operations)
    }

    pub fn handle(&self) -> JobHandle {
        self.handle.clone()
    }

    /// Move to `Running` and execute `operations` on a new worker thread.
    ///
    /// Returns as soon as the thread is spawned. If the thread cannot be
    /// spawned the runner ends `Faulted` and the error is also returned.
    pub fn start(self, operations: Vec<Operation>) -> Result<JobHandle, RunnerError> {
        let shared = Arc::clone(&self.handle.shared);
        shared.set_running();

        let worker = Arc::clone(&shared);
        let spawned = thread::Builder::new()
            .name(shared.id.thread_name())
            .spawn(move || worker.run(operations));

        match spawned {
            Ok(_) => Ok(self.handle),
            Err(source) => {
                let detail = format!("failed to spawn worker thread: {}", source);
                error!(run_id = %shared.id, label = %shared.label, error = %source, "spawn failed");
                shared.log(&detail);
                shared.complete(RunnerState::Faulted, Some(detail));
                Err(RunnerError::Spawn { label: shared.label.clone(), source })
            }
        }
    }
}

/// Shared view of a runner; cheap to clone and usable from any thread.
#[derive(Clone)]
pub struct JobHandle {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for JobHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobHandle")
            .field("id", &self.shared.id)
            .field("label", &self.shared.label)
            .field("state", &self.state())
            .finish()
    }
}

impl JobHandle {
    pub fn id(&self) -> &RunId {
        &self.shared.id
    }

    pub fn label(&self) -> &str {
        &self.shared.label
    }

    pub fn state(&self) -> RunnerState {
        self.shared.status.lock().state
    }

    pub fn is_terminal(&self) -> bool {
        self.state().is_terminal()
    }

    /// Rendered failure of the operation that faulted the run, if any.
    pub fn fault(&self) -> Option<String> {
        self.shared.status.lock().fault.clone()
    }

    pub fn is_cancel_requested(&self) -> bool {
        self.shared.cancel_requested.load(Ordering::Acquire)
    }

    /// Ask the runner to stop before its next operation.
    ///
    /// Idempotent and safe to call from inside an operation. Has no effect
    /// once the runner is terminal.
    pub fn cancel(&self) {
        if self.is_terminal() {
            return;
        }
        if !self.shared.cancel_requested.swap(true, Ordering::AcqRel) {
            warn!(run_id = %self.shared.id, label = %self.shared.label, "cancellation requested");
            self.shared.log("Cancellation requested");
        }
    }

    /// Register the single continuation to run once the runner is terminal.
    ///
    /// It runs on the worker thread right after the terminal state is
    /// published, or immediately on the calling thread if the runner has
    /// already finished.
    pub fn on_completed<F>(&self, f: F) -> Result<(), RunnerError>
    where
        F: FnOnce(RunnerState) + Send + 'static,
    {
        let mut status = self.shared.status.lock();
        if !matches!(status.continuation, Slot::Vacant) {
            return Err(RunnerError::ContinuationRegistered);
        }
        if status.state.is_terminal() {
            status.continuation = Slot::Fired;
            let state = status.state;
            drop(status);
            f(state);
        } else {
            status.continuation = Slot::Registered(Box::new(f));
        }
        Ok(())
    }

    /// Wait for a terminal state from async code.
    pub async fn completed(&self) -> RunnerState {
        let mut rx = self.shared.watch.subscribe();
        let result = rx.wait_for(|state| state.is_terminal()).await.map(|state| *state);
        // The sender lives as long as `self`, so the error arm is not expected.
        result.unwrap_or_else(|_| self.state())
    }

    /// Block until the runner is terminal or `timeout` elapses.
    ///
    /// Intended for tests and diagnostics. Returns `None` on timeout.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<RunnerState> {
        let deadline = Instant::now() + timeout;
        let mut status = self.shared.status.lock();
        while !status.state.is_terminal() {
            if self.shared.changed.wait_until(&mut status, deadline).timed_out() {
                break;
            }
        }
        status.state.is_terminal().then_some(status.state)
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
