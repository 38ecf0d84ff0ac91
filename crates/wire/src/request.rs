// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request framing: `"IN"`, payload fields, `"END"`.

use std::io::{Read, Write};

use cfb_core::Request;

use crate::wire::{
    check_str, expect_marker, read_i64, read_strings, read_utf, write_field, write_i64,
    write_strings, END_MARKER, REQUEST_MARKER,
};
use crate::ProtocolError;

/// Check every string field of `request` without encoding it.
///
/// Reports the first offending field in wire order.
pub fn validate_request(request: &Request) -> Result<(), ProtocolError> {
    for (field, value) in request.strings() {
        check_str(value).map_err(|violation| ProtocolError::InvalidString { field, violation })?;
    }
    Ok(())
}

/// Encode a request into a fresh buffer.
pub fn encode_request(request: &Request) -> Result<Vec<u8>, ProtocolError> {
    let mut buf = Vec::new();
    write_field(&mut buf, "marker", REQUEST_MARKER)?;
    write_strings(&mut buf, "options", &request.options)?;
    write_i64(&mut buf, request.flags)?;
    write_i64(&mut buf, request.ms_version)?;
    write_strings(&mut buf, "include_dirs", &request.include_dirs)?;
    write_strings(&mut buf, "framework_dirs", &request.framework_dirs)?;
    write_strings(&mut buf, "vfs_overlay_files", &request.vfs_overlay_files)?;
    write_field(&mut buf, "module_name", &request.module_name)?;
    write_field(&mut buf, "predefines", &request.predefines)?;
    write_strings(&mut buf, "macros", &request.macros)?;
    write_field(&mut buf, "target_triple", &request.target_triple)?;
    write_field(&mut buf, "file", &request.file)?;
    write_field(&mut buf, "marker", END_MARKER)?;
    Ok(buf)
}

/// Write a request to the analyzer's input stream.
///
/// The frame is fully encoded before the first byte reaches `w`, so a request
/// that fails validation writes nothing. Does not flush or close `w`.
pub fn write_request<W: Write + ?Sized>(w: &mut W, request: &Request) -> Result<(), ProtocolError> {
    let buf = encode_request(request)?;
    w.write_all(&buf)?;
    Ok(())
}

/// Read a request frame, as the analyzer side of the protocol does.
pub fn read_request<R: Read + ?Sized>(r: &mut R) -> Result<Request, ProtocolError> {
    expect_marker(r, REQUEST_MARKER)?;
    let options = read_strings(r)?;
    let flags = read_i64(r)?;
    let ms_version = read_i64(r)?;
    let include_dirs = read_strings(r)?;
    let framework_dirs = read_strings(r)?;
    let vfs_overlay_files = read_strings(r)?;
    let module_name = read_utf(r)?;
    let predefines = read_utf(r)?;
    let macros = read_strings(r)?;
    let target_triple = read_utf(r)?;
    let file = read_utf(r)?;
    expect_marker(r, END_MARKER)?;

    Ok(Request {
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
    })
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
