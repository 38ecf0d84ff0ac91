// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Response framing: `"OUT"`, messages, measures, symbols, `"END"`.
//!
//! Measures and symbols are parsed only to keep the stream aligned; their
//! values are dropped.

use std::io::{Read, Write};

use cfb_core::{Message, MessagePart, Response};

use crate::wire::{
    expect_marker, read_bool, read_count, read_i32, read_utf, skip_bytes, write_bool, write_count,
    write_field, write_i32, END_MARKER, RESPONSE_MARKER,
};
use crate::ProtocolError;

/// Read a response frame from the analyzer's output stream.
///
/// Does not close `r`. Bytes after the closing marker are left unread.
pub fn read_response<R: Read + ?Sized>(r: &mut R) -> Result<Response, ProtocolError> {
    expect_marker(r, RESPONSE_MARKER)?;

    let count = read_count(r)?;
    let mut messages = Vec::with_capacity(count.min(256));
    for _ in 0..count {
        messages.push(read_message(r)?);
    }

    skip_measures(r)?;
    skip_symbols(r)?;
    expect_marker(r, END_MARKER)?;

    Ok(Response { messages })
}

fn read_message<R: Read + ?Sized>(r: &mut R) -> Result<Message, ProtocolError> {
    let rule_key = read_utf(r)?;
    let filename = read_utf(r)?;
    let line = read_i32(r)?;
    let column = read_i32(r)?;
    let end_line = read_i32(r)?;
    let end_column = read_i32(r)?;
    let _remediation_cost = read_i32(r)?;
    let text = read_utf(r)?;
    let parts_make_flow = read_bool(r)?;
    let parts = read_parts(r)?;

    Ok(Message {
        rule_key,
        filename,
        line,
        column,
        end_line,
        end_column,
        text,
        parts_make_flow,
        parts,
    })
}

fn read_parts<R: Read + ?Sized>(r: &mut R) -> Result<Vec<MessagePart>, ProtocolError> {
    let count = read_count(r)?;
    let mut parts = Vec::with_capacity(count.min(64));
    for _ in 0..count {
        parts.push(MessagePart {
            filename: read_utf(r)?,
            line: read_i32(r)?,
            column: read_i32(r)?,
            end_line: read_i32(r)?,
            end_column: read_i32(r)?,
            text: read_utf(r)?,
        });
    }
    Ok(parts)
}

/// Per-file metrics: filename, classes, functions, statements, complexity,
/// cognitive complexity, then a length-prefixed exec-lines blob.
fn skip_measures<R: Read + ?Sized>(r: &mut R) -> Result<(), ProtocolError> {
    let count = read_count(r)?;
    for _ in 0..count {
        read_utf(r)?;
        for _ in 0..5 {
            read_i32(r)?;
        }
        let exec_lines = read_count(r)?;
        skip_bytes(r, exec_lines)?;
    }
    Ok(())
}

/// Symbol references: per symbol a count of (line, column, end_line, end_column).
fn skip_symbols<R: Read + ?Sized>(r: &mut R) -> Result<(), ProtocolError> {
    let count = read_count(r)?;
    for _ in 0..count {
        let refs = read_count(r)?;
        for _ in 0..refs {
            for _ in 0..4 {
                read_i32(r)?;
            }
        }
    }
    Ok(())
}

/// Encode a response into a fresh buffer.
///
/// Remediation cost is written as `0`; measures and symbols are empty.
pub fn encode_response(response: &Response) -> Result<Vec<u8>, ProtocolError> {
    let mut buf = Vec::new();
    write_field(&mut buf, "marker", RESPONSE_MARKER)?;
    write_count(&mut buf, "messages", response.messages.len())?;
    for message in &response.messages {
        write_message(&mut buf, message)?;
    }
    // measures, symbols
    write_i32(&mut buf, 0)?;
    write_i32(&mut buf, 0)?;
    write_field(&mut buf, "marker", END_MARKER)?;
    Ok(buf)
}

/// Write a response frame, as the analyzer side of the protocol does.
///
/// Like [`write_request`](crate::write_request), nothing reaches `w` unless
/// the whole frame encodes.
pub fn write_response<W: Write + ?Sized>(
    w: &mut W,
    response: &Response,
) -> Result<(), ProtocolError> {
    let buf = encode_response(response)?;
    w.write_all(&buf)?;
    Ok(())
}

fn write_message(buf: &mut Vec<u8>, message: &Message) -> Result<(), ProtocolError> {
    write_field(buf, "rule_key", &message.rule_key)?;
    write_field(buf, "filename", &message.filename)?;
    write_i32(buf, message.line)?;
    write_i32(buf, message.column)?;
    write_i32(buf, message.end_line)?;
    write_i32(buf, message.end_column)?;
    write_i32(buf, 0)?;
    write_field(buf, "text", &message.text)?;
    write_bool(buf, message.parts_make_flow)?;
    write_count(buf, "parts", message.parts.len())?;
    for part in &message.parts {
        write_field(buf, "filename", &part.filename)?;
        write_i32(buf, part.line)?;
        write_i32(buf, part.column)?;
        write_i32(buf, part.end_line)?;
        write_i32(buf, part.end_column)?;
        write_field(buf, "text", &part.text)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
