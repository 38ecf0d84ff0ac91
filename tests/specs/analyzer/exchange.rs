// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Analyzer exchange specs
//!
//! Verify requests reach the analyzer intact and findings come back in wire order.

use crate::prelude::*;
use crate::prelude::assert_eq;

/// Echo one flow finding against the requested file.
fn flow_for(request: &Request) -> Response {
    Response::new(vec![flow_message(&request.file)])
}

#[test]
fn request_reaches_analyzer_and_findings_come_back() {
    init_logging();
    let (host, stub) = StubAnalyzer::serve(flow_for);
    let request = msvc_request("src/main.cpp");

    let response = analyze(&host, request.clone(), MemorySink::new()).wait(SPEC_WAIT).unwrap();
    drop(host);

    assert_eq!(response, Response::new(vec![flow_message("src/main.cpp")]));
    assert_eq!(stub.finish(), vec![request]);
}

#[test]
fn sequential_exchanges_share_one_connection() {
    init_logging();
    let (host, stub) = StubAnalyzer::serve(flow_for);
    let files = ["a.cpp", "b.cpp", "c.cpp"];

    for file in files {
        let response =
            analyze(&host, msvc_request(file), MemorySink::new()).wait(SPEC_WAIT).unwrap();
        assert_eq!(response.messages.len(), 1);
        assert_eq!(response.messages[0].filename.as_str(), file);
    }
    drop(host);

    let seen: Vec<String> = stub.finish().into_iter().map(|r| r.file).collect();
    assert_eq!(seen, files.map(String::from).to_vec());
}

#[test]
fn findings_keep_wire_order_without_dedup() {
    init_logging();
    let duplicate = flow_message("dup.cpp");
    let plain = Message::builder().rule_key("cpp:S1116").filename("dup.cpp").line(3).build();
    let messages = vec![duplicate.clone(), plain, duplicate];
    let reply = Response::new(messages.clone());
    let (host, stub) = StubAnalyzer::serve(move |_| reply.clone());

    let response =
        analyze(&host, msvc_request("dup.cpp"), MemorySink::new()).wait(SPEC_WAIT).unwrap();
    drop(host);
    stub.finish();

    assert_eq!(response.messages, messages);
    assert_eq!(response.messages[0].flow().map(<[MessagePart]>::len), Some(2));
    assert!(response.messages[1].flow().is_none());
}

#[test]
fn empty_arrays_and_empty_strings_cross_the_wire() {
    init_logging();
    let (host, stub) = StubAnalyzer::serve(|_| Response::default());
    let request = Request::builder("").build();

    let response = analyze(&host, request.clone(), MemorySink::new()).wait(SPEC_WAIT).unwrap();
    drop(host);

    assert!(response.is_empty());
    assert_eq!(stub.finish(), vec![request]);
}

#[test]
fn non_ascii_paths_round_trip() {
    init_logging();
    let (host, stub) = StubAnalyzer::serve(flow_for);
    let wide: Vec<u16> = "C:\\projets\\äöü\\файл.cpp".encode_utf16().collect();
    let file = cfb_wire::text_from_utf16(&wide).unwrap();

    let response =
        analyze(&host, msvc_request(&file), MemorySink::new()).wait(SPEC_WAIT).unwrap();
    drop(host);

    assert_eq!(response.messages_for(&file).count(), 1);
    assert_eq!(stub.finish()[0].file, file);
}

#[test]
fn findings_forward_as_json() {
    init_logging();
    let (host, stub) = StubAnalyzer::serve(flow_for);

    let response =
        analyze(&host, msvc_request("j.cpp"), MemorySink::new()).wait(SPEC_WAIT).unwrap();
    drop(host);
    stub.finish();

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["messages"][0]["rule_key"].as_str(), Some("cpp:S2259"));
    assert_eq!(json["messages"][0]["parts_make_flow"].as_bool(), Some(true));
    assert_eq!(json["messages"][0]["parts"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn exchange_can_be_awaited() {
    let (host, stub) = StubAnalyzer::serve(flow_for);

    let run = analyze(&host, msvc_request("async.cpp"), MemorySink::new());
    let response = run.completed().await.unwrap();
    drop(host);
    stub.finish();

    assert_eq!(response.messages[0].filename.as_str(), "async.cpp");
}
