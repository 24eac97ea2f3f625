// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Byte sources — where the decoder's input comes from.
//
// In raw mode the terminal is set to VMIN=0 / VTIME=1, so a `read()` on the
// tty returns as soon as one byte is available or after 100ms with nothing.
// That turns "no key yet" into an ordinary return value instead of an
// indefinite block, and it is what lets a lone ESC be told apart from the
// start of an escape sequence.
//
// `ByteSource` is the seam: `TtyInput` reads the real device one byte at a
// time, `SliceInput` replays a fixed byte string and then times out forever.
// The decoder and the viewport prober only ever see the trait.

use std::io;

/// A source of single bytes with timeout semantics.
pub trait ByteSource {
    /// Read one byte.
    ///
    /// `Ok(None)` means the read timed out with no data, which is not an
    /// error. Any `Err` is a real I/O failure.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error for anything other than a timeout.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        (**self).read_byte()
    }
}

// ─── TtyInput ────────────────────────────────────────────────────────────────

/// Unbuffered single-byte reads from a terminal file descriptor.
///
/// Reads bypass `std::io::Stdin`'s internal buffer so that bytes the
/// decoder does not ask for stay in the kernel until it does.
#[derive(Debug, Clone, Copy)]
pub struct TtyInput {
    fd: i32,
}

impl TtyInput {
    /// Read from an arbitrary file descriptor.
    #[must_use]
    pub const fn new(fd: i32) -> Self {
        Self { fd }
    }

    /// Read from standard input.
    #[cfg(unix)]
    #[must_use]
    pub const fn stdin() -> Self {
        Self::new(libc::STDIN_FILENO)
    }
}

/// Whether an error from `read()` just means "nothing arrived yet".
fn is_timeout(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
    )
}

#[cfg(unix)]
impl ByteSource for TtyInput {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = 0u8;
        let n = unsafe { libc::read(self.fd, (&raw mut byte).cast::<libc::c_void>(), 1) };

        match n {
            1 => Ok(Some(byte)),
            // VTIME expired with nothing to read.
            0 => Ok(None),
            _ => {
                let err = io::Error::last_os_error();
                if is_timeout(&err) { Ok(None) } else { Err(err) }
            }
        }
    }
}

#[cfg(not(unix))]
impl ByteSource for TtyInput {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        Err(io::ErrorKind::Unsupported.into())
    }
}

// ─── SliceInput ──────────────────────────────────────────────────────────────

/// Replays a fixed byte string, then reports a timeout on every read.
///
/// Used for decoding recorded input and in tests: an exhausted slice behaves
/// exactly like a terminal that has gone quiet.
#[derive(Debug, Clone)]
pub struct SliceInput<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> SliceInput<'a> {
    #[must_use]
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    /// Bytes not yet read.
    #[must_use]
    pub fn remaining(&self) -> &'a [u8] {
        &self.bytes[self.pos..]
    }
}

impl ByteSource for SliceInput<'_> {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let byte = self.bytes.get(self.pos).copied();
        if byte.is_some() {
            self.pos += 1;
        }
        Ok(byte)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
