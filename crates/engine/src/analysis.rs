// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One request/response exchange with the analyzer, run as a job.
//!
//! The caller owns transport setup and hands in a writer and a reader
//! (usually two clones of the same socket). The exchange runs as the single
//! operation of a [`JobRunner`], so it never blocks the calling thread and a
//! protocol failure is logged through the same sink as any other job fault.

use std::io::{Read, Write};
use std::sync::Arc;
use std::time::Duration;

use cfb_core::{Request, Response};
use cfb_wire::{read_response, validate_request, write_request, ProtocolError};
use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::runner::{
    describe_error, BoxError, JobHandle, JobRunner, Operation, RunnerError, RunnerState,
};
use crate::sink::LogSink;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Runner(#[from] RunnerError),

    #[error("analysis did not complete within {0:?}")]
    TimedOut(Duration),

    #[error("analysis was cancelled")]
    Cancelled,

    #[error("analysis failed: {0}")]
    Faulted(String),
}

type Outcome = Arc<Mutex<Option<Result<Response, ProtocolError>>>>;

/// An analysis exchange in flight.
#[derive(Debug)]
pub struct AnalysisRun {
    handle: JobHandle,
    outcome: Outcome,
}

impl AnalysisRun {
    /// Validate `request`, then write it and read the response on a worker thread.
    ///
    /// A request that cannot be encoded fails here and nothing is written.
    /// The run owns `writer` and `reader` until the exchange ends; neither
    /// is shut down by the codec.
    pub fn start<W, R>(
        request: Request,
        mut writer: W,
        mut reader: R,
        sink: Arc<dyn LogSink>,
    ) -> Result<Self, AnalysisError>
    where
        W: Write + Send + 'static,
        R: Read + Send + 'static,
    {
        validate_request(&request)?;

        let runner = JobRunner::new(format!("analyze {}", request.file), sink)?;
        let handle = runner.handle();
        let outcome: Outcome = Arc::new(Mutex::new(None));

        let slot = Arc::clone(&outcome);
        let run_id = handle.id().clone();
        let exchange: Operation = Box::new(move || {
            debug!(%run_id, file = %request.file, "sending analysis request");
            let result = write_request(&mut writer, &request)
                .and_then(|()| writer.flush().map_err(ProtocolError::from))
                .and_then(|()| read_response(&mut reader));

            let failure = match &result {
                Ok(response) => {
                    let messages = response.messages.len();
                    debug!(%run_id, messages, "analysis response received");
                    None
                }
                Err(err) => Some(describe_error(err)),
            };
            *slot.lock() = Some(result);
            match failure {
                Some(detail) => Err(BoxError::from(detail)),
                None => Ok(()),
            }
        });

        info!(run_id = %handle.id(), label = %handle.label(), "analysis scheduled");
        runner.start(vec![exchange])?;
        Ok(Self { handle, outcome })
    }

    pub fn handle(&self) -> JobHandle {
        self.handle.clone()
    }

    /// Request cancellation. A read already blocked on the stream is not interrupted.
    pub fn cancel(&self) {
        self.handle.cancel();
    }

    /// Block for the response for at most `timeout`.
    ///
    /// On timeout the run is cancelled and left to finish in the background.
    pub fn wait(self, timeout: Duration) -> Result<Response, AnalysisError> {
        match self.handle.wait_timeout(timeout) {
            Some(state) => self.into_result(state),
            None => {
                warn!(run_id = %self.handle.id(), ?timeout, "analysis timed out");
                self.handle.cancel();
                Err(AnalysisError::TimedOut(timeout))
            }
        }
    }

    /// [`wait`](Self::wait) with the timeout from `CFB_ANALYSIS_TIMEOUT_MS`.
    pub fn wait_default(self) -> Result<Response, AnalysisError> {
        self.wait(crate::env::analysis_timeout())
    }

    pub async fn completed(self) -> Result<Response, AnalysisError> {
        let state = self.handle.completed().await;
        self.into_result(state)
    }

    fn into_result(self, state: RunnerState) -> Result<Response, AnalysisError> {
        match self.outcome.lock().take() {
            Some(Ok(response)) => Ok(response),
            Some(Err(err)) => Err(AnalysisError::Protocol(err)),
            None if state == RunnerState::Cancelled => Err(AnalysisError::Cancelled),
            // Panicked before storing an outcome
            None => Err(AnalysisError::Faulted(self.handle.fault().unwrap_or_default())),
        }
    }
}

#[cfg(test)]
#[path = "analysis_tests.rs"]
mod tests;
