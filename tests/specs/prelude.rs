// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for specs: a stub analyzer on the far end of a Unix
//! socket pair, plus polling helpers.

use std::io;
use std::os::unix::net::UnixStream;
use std::sync::Once;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

pub use std::sync::Arc;

pub use cfb_core::test_support::{flow_message, msvc_request};
pub use cfb_core::{Message, MessagePart, Request, Response};
pub use cfb_engine::{
    AnalysisError, AnalysisRun, BoxError, JobRunner, MemorySink, Operation, RunnerState,
    TracingSink,
};
pub use cfb_wire::{read_request, write_response, ProtocolError};
pub use similar_asserts::assert_eq;

/// Upper bound for anything a spec waits on.
pub const SPEC_WAIT: Duration = Duration::from_secs(5);

static LOGGING: Once = Once::new();

/// Install the fmt subscriber once per test binary (`CFB_LOG` filters it).
pub fn init_logging() {
    LOGGING.call_once(|| {
        if cfb_engine::init_tracing() {
            tracing::debug!("spec logging installed");
        }
    });
}

/// Poll `check` until it holds or `max` elapses.
pub fn wait_for(max: Duration, mut check: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + max;
    while Instant::now() < deadline {
        if check() {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    check()
}

/// Analyzer stand-in serving requests until the host closes its end.
pub struct StubAnalyzer {
    thread: JoinHandle<Vec<Request>>,
}

impl StubAnalyzer {
    /// Answer every request with `respond(&request)`.
    ///
    /// Returns the host end of the socket and the stub.
    pub fn serve<F>(respond: F) -> (UnixStream, Self)
    where
        F: Fn(&Request) -> Response + Send + 'static,
    {
        let (host, mut peer) = UnixStream::pair().unwrap();
        let thread = thread::spawn(move || {
            let mut seen = Vec::new();
            loop {
                match read_request(&mut peer) {
                    Ok(request) => {
                        write_response(&mut peer, &respond(&request)).unwrap();
                        seen.push(request);
                    }
                    Err(ProtocolError::Io(e)) if e.kind() == io::ErrorKind::UnexpectedEof => {
                        return seen;
                    }
                    Err(e) => panic!("stub analyzer could not read request: {e}"),
                }
            }
        });
        (host, Self { thread })
    }

    /// Read one request, answer with `raw` bytes, then hang up.
    pub fn reply_raw(raw: Vec<u8>) -> (UnixStream, Self) {
        let (host, mut peer) = UnixStream::pair().unwrap();
        let thread = thread::spawn(move || {
            let request = read_request(&mut peer).unwrap();
            io::Write::write_all(&mut peer, &raw).unwrap();
            vec![request]
        });
        (host, Self { thread })
    }

    /// Requests the stub received, in order. Blocks until it exits.
    pub fn finish(self) -> Vec<Request> {
        self.thread.join().unwrap()
    }
}

/// Run one exchange over clones of `host`.
pub fn analyze(host: &UnixStream, request: Request, sink: Arc<MemorySink>) -> AnalysisRun {
    AnalysisRun::start(request, host.try_clone().unwrap(), host.try_clone().unwrap(), sink)
        .unwrap()
}

/// A `u16`-length-prefixed wire string.
pub fn wire_str(s: &str) -> Vec<u8> {
    let mut out = (s.len() as u16).to_be_bytes().to_vec();
    out.extend_from_slice(s.as_bytes());
    out
}
