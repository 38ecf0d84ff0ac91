// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Free-text diagnostic sinks handed to job runners.
//!
//! Runners also emit structured `tracing` events; a sink receives the same
//! lifecycle and fault text as plain lines so a host can show it to the user.

use tracing_subscriber::EnvFilter;

/// Receives one diagnostic line at a time.
pub trait LogSink: Send + Sync {
    fn write_line(&self, line: &str);
}

impl<F> LogSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn write_line(&self, line: &str) {
        self(line)
    }
}

/// Forwards sink lines to `tracing` under the `cfb::analyzer` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn write_line(&self, line: &str) {
        tracing::info!(target: "cfb::analyzer", "{}", line);
    }
}

/// Install a fmt subscriber filtered by `CFB_LOG` (default `info`).
///
/// Returns `false` when a global subscriber is already installed.
pub fn init_tracing() -> bool {
    let filter = EnvFilter::try_new(crate::env::log_filter())
        .unwrap_or_else(|_| EnvFilter::new(crate::env::DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).with_thread_names(true).try_init().is_ok()
}

/// Collects lines in memory for assertions.
#[cfg(any(test, feature = "test-support"))]
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: parking_lot::Mutex<Vec<String>>,
}

#[cfg(any(test, feature = "test-support"))]
impl MemorySink {
    pub fn new() -> std::sync::Arc<Self> {
        std::sync::Arc::new(Self::default())
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// True if any line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.lock().iter().any(|line| line.contains(needle))
    }
}

#[cfg(any(test, feature = "test-support"))]
impl LogSink for MemorySink {
    fn write_line(&self, line: &str) {
        self.lines.lock().push(line.to_string());
    }
}

#[cfg(test)]
#[path = "sink_tests.rs"]
mod tests;
