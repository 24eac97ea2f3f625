// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Append buffer — one frame, one write.
//
// Every byte of a frame (cursor hide, home, rows, cursor position, cursor
// show) is appended here first and handed to the terminal in a single
// `write_all`. The terminal never sees half a frame, so there is nothing to
// flicker.
//
// Growth uses `try_reserve`. If the allocator refuses, the append is dropped
// and the buffer keeps exactly what it had: a frame with a missing tail is
// better than an abort halfway through drawing.
//
// `TtyOutput` is the other half: `std::io::Stdout` is line buffered and
// would split a frame at its first newline, so frames go straight to the
// file descriptor with `write(2)`.

use std::io::{self, Write};

/// Starting capacity. An 80×24 frame of tildes is well under 1 KB; a full
/// screen of text fits in 8 KB without growing.
const DEFAULT_CAPACITY: usize = 8192;

/// An append-only byte buffer holding one composed frame.
pub struct AppendBuffer {
    buf: Vec<u8>,
}

impl AppendBuffer {
    /// Create an empty buffer with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create an empty buffer, reserving `capacity` bytes up front.
    ///
    /// A failed reservation leaves the buffer empty and unallocated; the
    /// first append will try again.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut buf = Vec::new();
        let _ = buf.try_reserve(capacity);
        Self { buf }
    }

    /// Append `bytes` at the end.
    ///
    /// Returns `false` (and leaves the buffer untouched) if the buffer
    /// could not grow to hold them.
    pub fn append(&mut self, bytes: &[u8]) -> bool {
        if self.buf.try_reserve(bytes.len()).is_err() {
            tracing::warn!(len = bytes.len(), "append buffer could not grow, dropping bytes");
            return false;
        }
        self.buf.extend_from_slice(bytes);
        true
    }

    /// Number of bytes accumulated.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether the buffer is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The accumulated bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Hand the whole frame to `w` in one `write_all`, then flush.
    ///
    /// Consumes the buffer: a frame is composed, written, and discarded.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to or flushing `w` fails.
    pub fn flush_to(self, w: &mut impl Write) -> io::Result<()> {
        if !self.buf.is_empty() {
            w.write_all(&self.buf)?;
        }
        w.flush()
    }
}

impl Write for AppendBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.append(buf) {
            Ok(buf.len())
        } else {
            Err(io::ErrorKind::OutOfMemory.into())
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        // Intentionally a no-op. The real write happens in flush_to().
        Ok(())
    }
}

impl Default for AppendBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── TtyOutput ───────────────────────────────────────────────────────────────

/// Unbuffered writes to a terminal file descriptor.
#[derive(Debug, Clone, Copy)]
pub struct TtyOutput {
    fd: i32,
}

impl TtyOutput {
    #[must_use]
    pub const fn new(fd: i32) -> Self {
        Self { fd }
    }

    /// Write to standard output.
    #[cfg(unix)]
    #[must_use]
    pub const fn stdout() -> Self {
        Self::new(libc::STDOUT_FILENO)
    }
}

#[cfg(unix)]
impl Write for TtyOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = unsafe { libc::write(self.fd, buf.as_ptr().cast::<libc::c_void>(), buf.len()) };
        usize::try_from(n).map_err(|_| io::Error::last_os_error())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(not(unix))]
impl Write for TtyOutput {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::ErrorKind::Unsupported.into())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
