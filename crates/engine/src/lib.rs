// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cfb-engine: background job runner and analyzer exchanges built on it

pub mod analysis;
pub mod env;
pub mod runner;
pub mod sink;

pub use analysis::{AnalysisError, AnalysisRun};
pub use runner::{
    describe_error, BoxError, JobHandle, JobRunner, Operation, RunnerError, RunnerState,
};
#[cfg(any(test, feature = "test-support"))]
pub use sink::MemorySink;
pub use sink::{init_tracing, LogSink, TracingSink};
