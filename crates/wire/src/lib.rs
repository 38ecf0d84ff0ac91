// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Binary protocol spoken with the native C/C++ analyzer.
//!
//! Wire format: big-endian integers, `u16`-length-prefixed UTF-8 strings,
//! `i32`-count-prefixed arrays. Requests are framed `"IN"` … `"END"`,
//! responses `"OUT"` … `"END"`. Codec functions never close the stream.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod request;
mod response;
mod wire;

pub use request::{encode_request, read_request, validate_request, write_request};
pub use response::{encode_response, read_response, write_response};
pub use wire::{
    check_str, expect_marker, read_bool, read_count, read_i32, read_i64, read_strings, read_u16,
    read_utf, skip_bytes, text_from_utf16, write_bool, write_i32, write_i64, write_strings,
    write_u16, write_utf, ProtocolError, StringViolation, END_MARKER, MAX_STRING_BYTES,
    REQUEST_MARKER, RESPONSE_MARKER,
};
