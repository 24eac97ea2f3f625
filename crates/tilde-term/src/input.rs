// SPDX-License-Identifier: MIT
//
// Terminal input decoder.
//
// Turns raw stdin bytes into keys. Plain bytes pass through as
// `Key::Char`; an ESC starts one of the short sequences terminals send for
// navigation keys:
//
// - `ESC [ A..D / H / F`   — arrows, Home, End (CSI)
// - `ESC [ 1..8 ~`         — Home, Insert, Delete, End, PageUp, PageDown
// - `ESC O H / F`          — Home, End (SS3, application cursor mode)
//
// # Design
//
// The grammar is data: three small tables keyed by the final byte, looked
// up by `lookup`. The decoder reads one byte at a time from a `ByteSource`
// and never reads past the end of the sequence it is matching, so the next
// key's bytes stay in the source.
//
// A lone ESC is ambiguous: it is the Escape key, or the start of a sequence
// whose remaining bytes have not arrived. The source's read timeout
// resolves it. If the next byte does not arrive within one timeout the
// decoder returns `Key::Escape`. Anything the tables don't know also comes
// back as `Key::Escape`. Unknown input is unresolved, never an error.

use std::io;

use crate::reader::ByteSource;

// ─── Key ─────────────────────────────────────────────────────────────────────

/// The escape byte (0x1B).
pub const ESC: u8 = 0x1b;

/// A decoded key.
///
/// Bytes that are not part of an escape sequence arrive as
/// [`Char`](Key::Char), control characters included: Ctrl-Q is
/// `Char(0x11)`, see [`ctrl`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A literal byte.
    Char(u8),
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Delete,
    Insert,
    Escape,
}

/// The byte a terminal sends for Ctrl + `letter`.
///
/// Ctrl clears bits 5 and 6, so `ctrl(b'q')` and `ctrl(b'Q')` are both 0x11.
#[inline]
#[must_use]
pub const fn ctrl(letter: u8) -> u8 {
    letter & 0x1f
}

// ─── Grammar Tables ─────────────────────────────────────────────────────────

/// `ESC [ x` — letter-terminated CSI sequences.
const CSI_FINAL: &[(u8, Key)] = &[
    (b'A', Key::Up),
    (b'B', Key::Down),
    (b'C', Key::Right),
    (b'D', Key::Left),
    (b'H', Key::Home),
    (b'F', Key::End),
];

/// `ESC [ d ~` — tilde-terminated CSI sequences, keyed by the digit.
///
/// Home and End each have two encodings depending on the terminal
/// (1/7 and 4/8: xterm vs. rxvt).
const CSI_TILDE: &[(u8, Key)] = &[
    (b'1', Key::Home),
    (b'2', Key::Insert),
    (b'3', Key::Delete),
    (b'4', Key::End),
    (b'5', Key::PageUp),
    (b'6', Key::PageDown),
    (b'7', Key::Home),
    (b'8', Key::End),
];

/// `ESC O x` — SS3 sequences.
const SS3_FINAL: &[(u8, Key)] = &[(b'H', Key::Home), (b'F', Key::End)];

/// Find `byte` in a grammar table.
fn lookup(table: &[(u8, Key)], byte: u8) -> Option<Key> {
    table.iter().find(|&&(b, _)| b == byte).map(|&(_, key)| key)
}

// ─── Decoder ────────────────────────────────────────────────────────────────

/// Reads bytes from a [`ByteSource`] and yields one [`Key`] at a time.
///
/// # Example
///
/// ```
/// use tilde_term::input::{Decoder, Key};
/// use tilde_term::reader::SliceInput;
///
/// let mut decoder = Decoder::new(SliceInput::new(b"\x1b[Ax"));
/// assert_eq!(decoder.next_key()?, Key::Up);
/// assert_eq!(decoder.next_key()?, Key::Char(b'x'));
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct Decoder<S> {
    source: S,
}

impl<S: ByteSource> Decoder<S> {
    #[must_use]
    pub const fn new(source: S) -> Self {
        Self { source }
    }

    /// Give the byte source back.
    pub fn into_inner(self) -> S {
        self.source
    }

    /// Block until a key arrives.
    ///
    /// Read timeouts are retried silently; only real I/O errors return.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from the byte source other than a timeout.
    pub fn next_key(&mut self) -> io::Result<Key> {
        loop {
            if let Some(key) = self.try_next_key()? {
                return Ok(key);
            }
        }
    }

    /// Decode one key, or `None` if no byte arrived within one timeout.
    ///
    /// Once the first byte has arrived this always produces a key: an
    /// escape sequence cut short by a timeout becomes [`Key::Escape`].
    ///
    /// # Errors
    ///
    /// Returns any I/O error from the byte source other than a timeout.
    pub fn try_next_key(&mut self) -> io::Result<Option<Key>> {
        let Some(first) = self.source.read_byte()? else {
            return Ok(None);
        };
        if first != ESC {
            return Ok(Some(Key::Char(first)));
        }
        self.decode_escape().map(Some)
    }

    /// Iterate over keys until the source goes quiet.
    ///
    /// The iterator ends at the first timeout with no pending byte, or
    /// after yielding an I/O error.
    pub const fn keys(&mut self) -> Keys<'_, S> {
        Keys {
            decoder: self,
            done: false,
        }
    }

    /// Decode the rest of a sequence whose ESC has already been read.
    fn decode_escape(&mut self) -> io::Result<Key> {
        let Some(seq0) = self.source.read_byte()? else {
            return Ok(Key::Escape);
        };
        let Some(seq1) = self.source.read_byte()? else {
            return Ok(Key::Escape);
        };

        let key = match seq0 {
            b'[' if seq1.is_ascii_digit() => match self.source.read_byte()? {
                Some(b'~') => lookup(CSI_TILDE, seq1),
                _ => None,
            },
            b'[' => lookup(CSI_FINAL, seq1),
            b'O' => lookup(SS3_FINAL, seq1),
            _ => None,
        };

        Ok(key.unwrap_or_else(|| {
            tracing::debug!(seq0, seq1, "unrecognized escape sequence");
            Key::Escape
        }))
    }
}

/// Iterator returned by [`Decoder::keys`].
pub struct Keys<'a, S> {
    decoder: &'a mut Decoder<S>,
    done: bool,
}

impl<S: ByteSource> Iterator for Keys<'_, S> {
    type Item = io::Result<Key>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.decoder.try_next_key() {
            Ok(Some(key)) => Some(Ok(key)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
