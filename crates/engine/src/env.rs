// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the engine crate.

use std::time::Duration;

/// Overrides how long a caller waits for one analysis, in milliseconds.
pub const ANALYSIS_TIMEOUT_VAR: &str = "CFB_ANALYSIS_TIMEOUT_MS";

/// `tracing` filter directive used by [`init_tracing`](crate::init_tracing).
pub const LOG_FILTER_VAR: &str = "CFB_LOG";

pub const DEFAULT_ANALYSIS_TIMEOUT: Duration = Duration::from_secs(10);

pub const DEFAULT_LOG_FILTER: &str = "info";

/// Analysis wait timeout: `CFB_ANALYSIS_TIMEOUT_MS` when it is a positive
/// integer, otherwise 10s.
pub fn analysis_timeout() -> Duration {
    std::env::var(ANALYSIS_TIMEOUT_VAR)
        .ok()
        .and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|ms| *ms > 0)
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_ANALYSIS_TIMEOUT)
}

/// Log filter: `CFB_LOG` > `info`
pub fn log_filter() -> String {
    std::env::var(LOG_FILTER_VAR)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
