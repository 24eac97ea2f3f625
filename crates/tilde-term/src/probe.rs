// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Viewport probing — how big is the screen?
//
// The cheap answer is `ioctl(TIOCGWINSZ)`. Some pseudo-terminals answer
// that with zeros (or not at all), so there is a second route that only
// needs the terminal itself: push the cursor to the bottom-right corner
// with `ESC [ 999 C ESC [ 999 B` (cursor motion stops at the screen edge),
// then ask where it ended up with `ESC [ 6 n`. The reply, `ESC [ row ; col
// R`, arrives on stdin and *is* the window size.
//
// The reply parser is pure and works on a byte slice, so the protocol is
// tested without a terminal.

use std::io::Write;

use crate::ansi;
use crate::error::{Error, ProbeError, Result};
use crate::reader::ByteSource;

/// Upper bound on the cursor position reply, terminator included.
pub const REPLY_CAPACITY: usize = 32;

// ─── Viewport ────────────────────────────────────────────────────────────────

/// Screen dimensions in character cells. Both are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    rows: u16,
    cols: u16,
}

impl Viewport {
    /// A viewport of `rows × cols`, or `None` if either is zero.
    #[must_use]
    pub const fn new(rows: u16, cols: u16) -> Option<Self> {
        if rows == 0 || cols == 0 {
            None
        } else {
            Some(Self { rows, cols })
        }
    }

    #[inline]
    #[must_use]
    pub const fn rows(self) -> u16 {
        self.rows
    }

    #[inline]
    #[must_use]
    pub const fn cols(self) -> u16 {
        self.cols
    }

    /// Index of the last row.
    #[inline]
    #[must_use]
    pub const fn last_row(self) -> u16 {
        self.rows - 1
    }

    /// Index of the last column.
    #[inline]
    #[must_use]
    pub const fn last_col(self) -> u16 {
        self.cols - 1
    }
}

// ─── OS Query ────────────────────────────────────────────────────────────────

/// Ask the kernel for the window size of `fd` via `ioctl(TIOCGWINSZ)`.
///
/// Returns `None` if the query fails or reports a zero dimension.
#[cfg(unix)]
#[must_use]
pub fn query_os_size(fd: i32) -> Option<Viewport> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(fd, libc::TIOCGWINSZ, &raw mut ws) };

    if result == 0 {
        Viewport::new(ws.ws_row, ws.ws_col)
    } else {
        None
    }
}

#[cfg(not(unix))]
#[must_use]
pub fn query_os_size(_fd: i32) -> Option<Viewport> {
    None
}

// ─── Cursor Position Report ─────────────────────────────────────────────────

/// Read a cursor position reply from `src`.
///
/// Collects bytes until the `R` terminator (not included in the result),
/// until [`REPLY_CAPACITY`] bytes have been read, or until a read times out.
///
/// # Errors
///
/// Returns the I/O error if a read fails.
pub fn read_cursor_report(src: &mut impl ByteSource) -> std::io::Result<Vec<u8>> {
    let mut reply = Vec::with_capacity(REPLY_CAPACITY);
    while reply.len() < REPLY_CAPACITY {
        match src.read_byte()? {
            Some(b'R') | None => break,
            Some(b) => reply.push(b),
        }
    }
    Ok(reply)
}

/// Parse `ESC [ row ; col`. Anything after the column digits, such as the
/// `R` terminator, is ignored.
///
/// # Errors
///
/// - [`ProbeError::NoReply`] if `reply` is empty
/// - [`ProbeError::BadPrefix`] if it does not start with `ESC [`
/// - [`ProbeError::MissingField`] if either number is absent or out of range
/// - [`ProbeError::ZeroDimension`] if either number is zero
pub fn parse_cursor_report(reply: &[u8]) -> std::result::Result<(u16, u16), ProbeError> {
    if reply.is_empty() {
        return Err(ProbeError::NoReply);
    }
    let body = reply
        .strip_prefix(b"\x1b[")
        .ok_or(ProbeError::BadPrefix)?;

    let (row, rest) = leading_u16(body).ok_or(ProbeError::MissingField)?;
    let rest = rest.strip_prefix(b";").ok_or(ProbeError::MissingField)?;
    let (col, _) = leading_u16(rest).ok_or(ProbeError::MissingField)?;

    if row == 0 || col == 0 {
        return Err(ProbeError::ZeroDimension);
    }
    Ok((row, col))
}

/// Split off and parse the run of ASCII digits at the start of `bytes`.
fn leading_u16(bytes: &[u8]) -> Option<(u16, &[u8])> {
    let end = bytes.iter().position(|b| !b.is_ascii_digit()).unwrap_or(bytes.len());
    if end == 0 {
        return None;
    }
    let (digits, rest) = bytes.split_at(end);
    let value = std::str::from_utf8(digits).ok()?.parse().ok()?;
    Some((value, rest))
}

/// Measure the window by moving the cursor to the far corner and asking
/// the terminal where it is.
///
/// Leaves the cursor in the bottom-right corner; the next frame homes it.
///
/// # Errors
///
/// Returns [`ProbeError::Io`] if writing the queries or reading the reply
/// fails, or the parse error for a malformed reply.
pub fn probe_by_cursor_report(
    out: &mut impl Write,
    src: &mut impl ByteSource,
) -> std::result::Result<Viewport, ProbeError> {
    ansi::cursor_to_far_corner(out)?;
    ansi::request_cursor_position(out)?;
    out.flush()?;

    let reply = read_cursor_report(src)?;
    let (rows, cols) = parse_cursor_report(&reply)?;
    Viewport::new(rows, cols).ok_or(ProbeError::ZeroDimension)
}

/// Determine the viewport: OS query on `fd` first, cursor report second.
///
/// # Errors
///
/// Returns [`Error::Probe`] when both routes fail.
pub fn probe(out: &mut impl Write, src: &mut impl ByteSource, fd: i32) -> Result<Viewport> {
    if let Some(viewport) = query_os_size(fd) {
        tracing::debug!(rows = viewport.rows, cols = viewport.cols, "window size from ioctl");
        return Ok(viewport);
    }

    tracing::debug!("ioctl window size unavailable, asking the terminal");
    let viewport = probe_by_cursor_report(out, src).map_err(Error::Probe)?;
    tracing::debug!(rows = viewport.rows, cols = viewport.cols, "window size from cursor report");
    Ok(viewport)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
