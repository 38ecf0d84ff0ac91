// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{Message, MessagePart, Request};

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for values that satisfy the wire string rules.
pub mod strategies {
    use crate::{Message, MessagePart, Request, Response};
    use proptest::collection::vec;
    use proptest::prelude::*;

    /// Any string without NUL, kept short so generated frames stay small.
    pub fn arb_wire_string() -> impl Strategy<Value = String> {
        "[^\\x00]{0,24}"
    }

    pub fn arb_wire_strings() -> impl Strategy<Value = Vec<String>> {
        vec(arb_wire_string(), 0..4)
    }

    pub fn arb_request() -> impl Strategy<Value = Request> {
        (
            (arb_wire_strings(), any::<i64>(), any::<i64>()),
            (arb_wire_strings(), arb_wire_strings(), arb_wire_strings()),
            (arb_wire_string(), arb_wire_string(), arb_wire_strings()),
            (arb_wire_string(), arb_wire_string()),
        )
            .prop_map(
                |(
                    (options, flags, ms_version),
                    (include_dirs, framework_dirs, vfs_overlay_files),
                    (module_name, predefines, macros),
                    (target_triple, file),
                )| Request {
                    options,
                    flags,
                    ms_version,
                    include_dirs,
                    framework_dirs,
                    vfs_overlay_files,
                    module_name,
                    predefines,
                    macros,
                    target_triple,
                    file,
                },
            )
    }

    pub fn arb_message_part() -> impl Strategy<Value = MessagePart> {
        (arb_wire_string(), any::<[i32; 4]>(), arb_wire_string()).prop_map(
            |(filename, [line, column, end_line, end_column], text)| MessagePart {
                filename,
                line,
                column,
                end_line,
                end_column,
                text,
            },
        )
    }

    pub fn arb_message() -> impl Strategy<Value = Message> {
        (
            (arb_wire_string(), arb_wire_string(), any::<[i32; 4]>()),
            (arb_wire_string(), any::<bool>(), vec(arb_message_part(), 0..3)),
        )
            .prop_map(
                |(
                    (rule_key, filename, [line, column, end_line, end_column]),
                    (text, parts_make_flow, parts),
                )| Message {
                    rule_key,
                    filename,
                    line,
                    column,
                    end_line,
                    end_column,
                    text,
                    parts_make_flow,
                    parts,
                },
            )
    }

    pub fn arb_response() -> impl Strategy<Value = Response> {
        vec(arb_message(), 0..4).prop_map(Response::new)
    }
}

// ── Fixture factory functions ───────────────────────────────────────────────

/// A request resembling what the host sends for a typical MSVC project.
pub fn msvc_request(file: &str) -> Request {
    Request::builder(file)
        .option("-std=c++17")
        .flags(1)
        .ms_version(191_627_045)
        .include_dir("C:/Program Files/MSVC/include")
        .module_name("")
        .predefines("#define _MSC_VER 1916\n")
        .define("_DEBUG")
        .target_triple("x86_64-pc-windows")
        .build()
}

/// A finding with a two-step execution flow.
pub fn flow_message(file: &str) -> Message {
    Message::builder()
        .rule_key("cpp:S2259")
        .filename(file)
        .line(12)
        .column(5)
        .end_line(12)
        .end_column(14)
        .text("Dereference of null pointer")
        .parts_make_flow(true)
        .parts(vec![
            MessagePart::builder().filename(file).line(10).text("'p' initialized to null").build(),
            MessagePart::builder().filename(file).line(12).text("Dereference of 'p'").build(),
        ])
        .build()
}
