// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Primitive encodings shared by request and response framing.
//!
//! All multi-byte integers are big-endian on the wire regardless of host byte
//! order. Strings are a `u16` byte length followed by UTF-8 bytes.

use std::io::{self, Read, Write};

use thiserror::Error;

/// Longest string payload the `u16` length prefix can describe.
pub const MAX_STRING_BYTES: usize = u16::MAX as usize;

/// Opens a request.
pub const REQUEST_MARKER: &str = "IN";
/// Opens a response.
pub const RESPONSE_MARKER: &str = "OUT";
/// Closes both requests and responses.
pub const END_MARKER: &str = "END";

/// Why a string cannot cross the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StringViolation {
    #[error("NUL character is not supported")]
    Nul,
    #[error("surrogate characters are not supported")]
    Surrogate,
    #[error("string size is too big to be serialized: {0}")]
    TooLong(usize),
}

/// Errors raised while encoding or decoding a frame.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("cannot encode {field}: {violation}")]
    InvalidString { field: &'static str, violation: StringViolation },

    #[error("{field} has too many elements to be serialized: {count}")]
    TooManyElements { field: &'static str, count: usize },

    #[error("communication issue with the analyzer: {expected} expected, found {found:?}")]
    Framing { expected: &'static str, found: String },

    #[error("negative count on the wire: {0}")]
    NegativeCount(i32),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ProtocolError {
    /// The request itself cannot be encoded; sending it again will fail the same way.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidString { .. } | Self::TooManyElements { .. })
    }

    /// The peer sent something other than the expected frame layout.
    pub fn is_framing(&self) -> bool {
        matches!(self, Self::Framing { .. } | Self::NegativeCount(_))
    }

    /// The violated string rule, for validation failures.
    pub fn violation(&self) -> Option<StringViolation> {
        match self {
            Self::InvalidString { violation, .. } => Some(*violation),
            _ => None,
        }
    }
}

/// Check that `s` can be string-encoded.
///
/// A Rust `str` cannot hold surrogate code points, so only NUL and length are
/// checked here; host UTF-16 text goes through [`text_from_utf16`] first.
pub fn check_str(s: &str) -> Result<(), StringViolation> {
    if s.contains('\0') {
        return Err(StringViolation::Nul);
    }
    if s.len() > MAX_STRING_BYTES {
        return Err(StringViolation::TooLong(s.len()));
    }
    Ok(())
}

/// Convert host UTF-16 text (e.g. a Windows path) into a wire-safe string.
pub fn text_from_utf16(units: &[u16]) -> Result<String, StringViolation> {
    let text = char::decode_utf16(units.iter().copied())
        .collect::<Result<String, _>>()
        .map_err(|_| StringViolation::Surrogate)?;
    check_str(&text)?;
    Ok(text)
}

// ── Writers ─────────────────────────────────────────────────────────────

pub fn write_i32<W: Write + ?Sized>(w: &mut W, v: i32) -> io::Result<()> {
    w.write_all(&v.to_be_bytes())
}

pub fn write_i64<W: Write + ?Sized>(w: &mut W, v: i64) -> io::Result<()> {
    w.write_all(&v.to_be_bytes())
}

pub fn write_u16<W: Write + ?Sized>(w: &mut W, v: u16) -> io::Result<()> {
    w.write_all(&v.to_be_bytes())
}

pub fn write_bool<W: Write + ?Sized>(w: &mut W, v: bool) -> io::Result<()> {
    w.write_all(&[u8::from(v)])
}

/// Write a length-prefixed UTF-8 string.
///
/// Validation happens before the length prefix is written, so a rejected
/// string leaves `w` untouched.
pub fn write_utf<W: Write + ?Sized>(w: &mut W, s: &str) -> Result<(), ProtocolError> {
    write_field(w, "string", s)
}

pub(crate) fn write_field<W: Write + ?Sized>(
    w: &mut W,
    field: &'static str,
    s: &str,
) -> Result<(), ProtocolError> {
    check_str(s).map_err(|violation| ProtocolError::InvalidString { field, violation })?;
    // check_str bounds the length to u16
    write_u16(w, s.len() as u16)?;
    w.write_all(s.as_bytes())?;
    Ok(())
}

/// Write an `i32` element count followed by each string.
pub fn write_strings<W: Write + ?Sized>(
    w: &mut W,
    field: &'static str,
    values: &[String],
) -> Result<(), ProtocolError> {
    write_count(w, field, values.len())?;
    for value in values {
        write_field(w, field, value)?;
    }
    Ok(())
}

pub(crate) fn write_count<W: Write + ?Sized>(
    w: &mut W,
    field: &'static str,
    count: usize,
) -> Result<(), ProtocolError> {
    let count = i32::try_from(count)
        .map_err(|_| ProtocolError::TooManyElements { field, count })?;
    write_i32(w, count)?;
    Ok(())
}

// ── Readers ─────────────────────────────────────────────────────────────

pub fn read_i32<R: Read + ?Sized>(r: &mut R) -> io::Result<i32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(i32::from_be_bytes(buf))
}

pub fn read_i64<R: Read + ?Sized>(r: &mut R) -> io::Result<i64> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(i64::from_be_bytes(buf))
}

pub fn read_u16<R: Read + ?Sized>(r: &mut R) -> io::Result<u16> {
    let mut buf = [0u8; 2];
    r.read_exact(&mut buf)?;
    Ok(u16::from_be_bytes(buf))
}

/// Read a one-byte boolean; any nonzero value is `true`.
pub fn read_bool<R: Read + ?Sized>(r: &mut R) -> io::Result<bool> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0] != 0)
}

fn read_utf_bytes<R: Read + ?Sized>(r: &mut R) -> io::Result<Vec<u8>> {
    let len = read_u16(r)?;
    let mut bytes = vec![0u8; usize::from(len)];
    r.read_exact(&mut bytes)?;
    Ok(bytes)
}

/// Read a string field. Malformed UTF-8 sequences decode as U+FFFD so one
/// bad path or message text does not cost the rest of the frame.
pub fn read_utf<R: Read + ?Sized>(r: &mut R) -> io::Result<String> {
    let bytes = read_utf_bytes(r)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Read an `i32` element count, rejecting negative values.
pub fn read_count<R: Read + ?Sized>(r: &mut R) -> Result<usize, ProtocolError> {
    let count = read_i32(r)?;
    usize::try_from(count).map_err(|_| ProtocolError::NegativeCount(count))
}

pub fn read_strings<R: Read + ?Sized>(r: &mut R) -> Result<Vec<String>, ProtocolError> {
    let count = read_count(r)?;
    // Capacity is capped: the count comes from the peer.
    let mut values = Vec::with_capacity(count.min(64));
    for _ in 0..count {
        values.push(read_utf(r)?);
    }
    Ok(values)
}

/// Read and discard exactly `len` bytes.
pub fn skip_bytes<R: Read + ?Sized>(r: &mut R, len: usize) -> io::Result<()> {
    let skipped = io::copy(&mut (&mut *r).take(len as u64), &mut io::sink())?;
    if skipped < len as u64 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("expected {} bytes, stream ended after {}", len, skipped),
        ));
    }
    Ok(())
}

/// Read a marker string and fail with a framing error unless it equals `expected`.
///
/// Nothing past the marker is consumed on mismatch.
pub fn expect_marker<R: Read + ?Sized>(
    r: &mut R,
    expected: &'static str,
) -> Result<(), ProtocolError> {
    let found = read_utf_bytes(r)?;
    if found != expected.as_bytes() {
        return Err(ProtocolError::Framing {
            expected,
            found: String::from_utf8_lossy(&found).into_owned(),
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "wire_tests.rs"]
mod tests;
