// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identifiers for runner instances.

use smol_str::SmolStr;

/// Returns a string slice truncated to at most `n` characters.
pub fn short(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

/// Unique identifier for one job runner instance: `run-` plus 19 random
/// characters, which fits `SmolStr` inline storage.
///
/// Appears in worker thread names and in structured log fields so that
/// interleaved output from concurrent runners can be told apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RunId(SmolStr);

impl RunId {
    pub const PREFIX: &'static str = "run-";

    pub fn new() -> Self {
        Self(SmolStr::new(format!("{}{}", Self::PREFIX, nanoid::nanoid!(19))))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The random part, without `run-`.
    pub fn suffix(&self) -> &str {
        self.0.strip_prefix(Self::PREFIX).unwrap_or(&self.0)
    }

    /// First `n` characters of [`suffix`](Self::suffix).
    pub fn short(&self, n: usize) -> &str {
        short(self.suffix(), n)
    }

    /// Name given to the worker thread that executes this run.
    pub fn thread_name(&self) -> String {
        format!("cfb-runner-{}", self.short(8))
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
