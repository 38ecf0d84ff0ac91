// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Analyzer failure specs
//!
//! Verify bad requests never reach the socket and bad replies fault the run.

use std::io::Read;
use std::os::unix::net::UnixStream;

use cfb_wire::StringViolation;

use crate::prelude::*;
use crate::prelude::assert_eq;

#[test]
fn request_with_nul_is_rejected_before_sending() {
    init_logging();
    let (host, mut peer) = UnixStream::pair().unwrap();
    let request = Request::builder("main.cpp").define("A\0B").build();

    let err = AnalysisRun::start(
        request,
        host.try_clone().unwrap(),
        host.try_clone().unwrap(),
        MemorySink::new(),
    )
    .unwrap_err();
    drop(host);

    match err {
        AnalysisError::Protocol(e) => {
            assert!(e.is_validation());
            assert_eq!(e.violation(), Some(StringViolation::Nul));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    let mut sent = Vec::new();
    peer.read_to_end(&mut sent).unwrap();
    assert!(sent.is_empty(), "nothing may reach the analyzer");
}

#[test]
fn oversized_predefines_are_rejected() {
    init_logging();
    let (host, _peer) = UnixStream::pair().unwrap();
    let request = Request::builder("main.cpp").predefines("x".repeat(65_536)).build();

    let err = AnalysisRun::start(
        request,
        host.try_clone().unwrap(),
        host.try_clone().unwrap(),
        MemorySink::new(),
    )
    .unwrap_err();

    let violation = match &err {
        AnalysisError::Protocol(e) => e.violation(),
        _ => None,
    };
    assert_eq!(violation, Some(StringViolation::TooLong(65_536)), "{err:?}");
}

#[test]
fn unexpected_marker_faults_the_run() {
    init_logging();
    let (host, stub) = StubAnalyzer::reply_raw(wire_str("NOPE"));
    let sink = MemorySink::new();

    let run = analyze(&host, msvc_request("a.cpp"), Arc::clone(&sink));
    let handle = run.handle();
    let err = run.wait(SPEC_WAIT).unwrap_err();
    drop(host);
    stub.finish();

    match &err {
        AnalysisError::Protocol(ProtocolError::Framing { expected, found }) => {
            assert_eq!(*expected, "OUT");
            assert_eq!(found.as_str(), "NOPE");
        }
        other => panic!("expected framing error, got {other:?}"),
    }
    assert_eq!(handle.state(), RunnerState::Faulted);
    assert!(sink.contains("Error executing operation 1 of 1"));
    assert!(sink.contains("OUT expected"));
}

#[test]
fn missing_end_marker_is_a_framing_error() {
    init_logging();
    let mut raw = wire_str("OUT");
    raw.extend_from_slice(&0i32.to_be_bytes()); // messages
    raw.extend_from_slice(&0i32.to_be_bytes()); // measures
    raw.extend_from_slice(&0i32.to_be_bytes()); // symbols
    raw.extend(wire_str("FIN"));
    let (host, stub) = StubAnalyzer::reply_raw(raw);

    let err = analyze(&host, msvc_request("a.cpp"), MemorySink::new()).wait(SPEC_WAIT).unwrap_err();
    drop(host);
    stub.finish();

    assert!(matches!(&err, AnalysisError::Protocol(e) if e.is_framing()), "{err:?}");
}

#[test]
fn analyzer_hanging_up_is_an_io_error() {
    init_logging();
    let (host, stub) = StubAnalyzer::reply_raw(Vec::new());
    let sink = MemorySink::new();

    let run = analyze(&host, msvc_request("gone.cpp"), Arc::clone(&sink));
    let err = run.wait(SPEC_WAIT).unwrap_err();
    drop(host);
    stub.finish();

    assert!(matches!(err, AnalysisError::Protocol(ProtocolError::Io(_))), "{err:?}");
    assert!(sink.contains("[analyze gone.cpp]"));
}

#[test]
fn silent_analyzer_times_out() {
    init_logging();
    let (host, peer) = UnixStream::pair().unwrap();

    let run = analyze(&host, msvc_request("slow.cpp"), MemorySink::new());
    let handle = run.handle();
    let err = run.wait(std::time::Duration::from_millis(50)).unwrap_err();

    assert!(matches!(err, AnalysisError::TimedOut(_)), "{err:?}");
    assert!(handle.is_cancel_requested());

    // Closing the analyzer end unblocks the pending read
    drop(peer);
    assert!(wait_for(SPEC_WAIT, || handle.is_terminal()));
    assert_eq!(handle.state(), RunnerState::Faulted);
}
