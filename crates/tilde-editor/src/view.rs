//! View — composing a frame.
//!
//! A frame is built front to back into one [`AppendBuffer`] and handed to
//! the terminal in a single write:
//!
//! ```text
//! ESC[?25l  ESC[H                      hide cursor, go home
//! <row 0> ESC[K \r\n                   each row, erased to end of line
//! ...
//! <row N-1> ESC[K                      last row has no trailing \r\n
//! ESC[{row+1};{col+1}H  ESC[?25h       place cursor, show it
//! ```
//!
//! Each row is one of:
//!
//! - a content row, cut to the viewport width
//! - the welcome banner, when there is no content and this is the row a
//!   third of the way down
//! - the placeholder glyph (`~`) for rows past the end of the content
//!
//! The cursor stays hidden while rows are drawn so it never flickers across
//! the screen. The trailing `\r\n` is skipped on the last row because it
//! would scroll the terminal by one line.

use std::io::{self, Write};

use tilde_term::ansi;
use tilde_term::output::AppendBuffer;
use tilde_term::probe::Viewport;

use crate::cursor::Cursor;
use crate::options::Options;

/// Build a complete frame.
///
/// `content` holds the text rows to show from the top; rows past its end
/// get the placeholder. Rows are cut to the viewport width byte for byte.
#[must_use]
pub fn compose_frame<R: AsRef<[u8]>>(
    viewport: Viewport,
    cursor: Cursor,
    content: &[R],
    options: &Options,
) -> AppendBuffer {
    let mut ab = AppendBuffer::new();
    let cols = usize::from(viewport.cols());

    push_sequence(&mut ab, |w| ansi::cursor_hide(w));
    push_sequence(&mut ab, |w| ansi::cursor_home(w));

    for y in 0..viewport.rows() {
        let row = usize::from(y);
        if let Some(line) = content.get(row) {
            let line = line.as_ref();
            ab.append(&line[..line.len().min(cols)]);
        } else if content.is_empty() && y == viewport.rows() / 3 {
            draw_banner(&mut ab, options.banner.as_bytes(), options.placeholder, cols);
        } else {
            ab.append(&[options.placeholder]);
        }

        push_sequence(&mut ab, |w| ansi::clear_to_eol(w));
        if y < viewport.last_row() {
            ab.append(b"\r\n");
        }
    }

    push_sequence(&mut ab, |w| ansi::cursor_to(w, cursor.row, cursor.col));
    push_sequence(&mut ab, |w| ansi::cursor_show(w));
    ab
}

/// Longest sequence a frame uses: `ESC[65536;65536H` is 14 bytes.
const SEQUENCE_MAX: usize = 16;

/// Format one escape sequence on the stack, then append it whole.
///
/// A sequence that does not fit in [`SEQUENCE_MAX`] bytes is dropped, and
/// so is one the buffer cannot grow for. Either way no partial sequence
/// reaches the frame.
fn push_sequence<F>(ab: &mut AppendBuffer, write_seq: F) -> bool
where
    F: FnOnce(&mut io::Cursor<&mut [u8]>) -> io::Result<()>,
{
    let mut scratch = [0u8; SEQUENCE_MAX];
    let mut w = io::Cursor::new(&mut scratch[..]);
    if write_seq(&mut w).is_err() {
        return false;
    }
    let Ok(len) = usize::try_from(w.position()) else {
        return false;
    };
    ab.append(&scratch[..len])
}

/// Center `banner` in a row of `cols` cells.
///
/// Padding is `(cols - len) / 2`; the first padding cell shows the
/// placeholder so the banner row still reads as an empty line.
fn draw_banner(ab: &mut AppendBuffer, banner: &[u8], placeholder: u8, cols: usize) {
    let banner = &banner[..banner.len().min(cols)];
    let mut padding = (cols - banner.len()) / 2;

    if padding > 0 {
        ab.append(&[placeholder]);
        padding -= 1;
    }
    ab.append(&b" ".repeat(padding));
    ab.append(banner);
}

/// Compose a frame and write it to `out` in one call.
///
/// # Errors
///
/// Returns the error from writing or flushing `out`.
pub fn render<R: AsRef<[u8]>>(
    out: &mut impl Write,
    viewport: Viewport,
    cursor: Cursor,
    content: &[R],
    options: &Options,
) -> io::Result<()> {
    let frame = compose_frame(viewport, cursor, content, options);
    tracing::trace!(bytes = frame.len(), "frame composed");
    frame.flush_to(out)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
