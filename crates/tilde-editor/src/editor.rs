//! Editor — the state the main loop owns.
//!
//! An [`Editor`] is created once the viewport is known and lives for the
//! whole session. The loop is strictly alternating: draw a frame, read one
//! key, apply it, repeat. Nothing is shared and nothing runs concurrently.
//!
//! Quitting clears the screen and homes the cursor so the shell prompt
//! comes back on a clean screen. Those two writes are best-effort; the
//! terminal is about to be handed back either way.

use std::io::Write;

use tilde_term::input::{Decoder, Key};
use tilde_term::probe::Viewport;
use tilde_term::reader::ByteSource;
use tilde_term::{Error, Result, ansi};

use crate::cursor::Cursor;
use crate::options::Options;
use crate::view;

/// What the loop should do after a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Keep going.
    Continue,
    /// Tear down and exit.
    Quit,
}

/// Viewport, cursor, and options for one session.
#[derive(Debug, Clone)]
pub struct Editor {
    viewport: Viewport,
    cursor: Cursor,
    options: Options,
}

impl Editor {
    /// A fresh editor with the cursor at the top-left cell.
    #[must_use]
    pub const fn new(viewport: Viewport, options: Options) -> Self {
        Self {
            viewport,
            cursor: Cursor::origin(),
            options,
        }
    }

    #[must_use]
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Apply one key: quit, or move the cursor.
    pub fn handle_key(&mut self, key: Key) -> Action {
        if key == Key::Char(self.options.quit_key) {
            return Action::Quit;
        }
        self.cursor = self.cursor.moved(key, self.viewport);
        Action::Continue
    }

    /// Draw the current state as one frame.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Write`] if the frame cannot be written.
    pub fn refresh(&self, out: &mut impl Write) -> Result<()> {
        let content: &[&[u8]] = &[];
        view::render(out, self.viewport, self.cursor, content, &self.options).map_err(Error::Write)
    }

    /// Run the draw / read / apply loop until the quit key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Write`] if a frame cannot be written and
    /// [`Error::Read`] if reading input fails.
    pub fn run<S: ByteSource>(&mut self, out: &mut impl Write, keys: &mut Decoder<S>) -> Result<()> {
        loop {
            self.refresh(out)?;

            let key = keys.next_key().map_err(Error::Read)?;
            tracing::trace!(?key, "key");

            if self.handle_key(key) == Action::Quit {
                tracing::info!("quit requested");
                clear_on_exit(out);
                return Ok(());
            }
        }
    }
}

/// Erase the screen and home the cursor, ignoring write failures.
pub fn clear_on_exit(out: &mut impl Write) {
    let _ = ansi::clear_screen(out);
    let _ = ansi::cursor_home(out);
    let _ = out.flush();
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tilde_term::input::ctrl;
    use tilde_term::reader::SliceInput;

    fn editor(rows: u16, cols: u16) -> Editor {
        Editor::new(Viewport::new(rows, cols).unwrap(), Options::default())
    }

    #[test]
    fn starts_at_origin() {
        assert_eq!(editor(24, 80).cursor(), Cursor::origin());
    }

    #[test]
    fn quit_key_quits() {
        let mut e = editor(24, 80);
        assert_eq!(e.handle_key(Key::Char(ctrl(b'q'))), Action::Quit);
    }

    #[test]
    fn plain_q_does_not_quit() {
        let mut e = editor(24, 80);
        assert_eq!(e.handle_key(Key::Char(b'q')), Action::Continue);
    }

    #[test]
    fn custom_quit_key() {
        let opts = Options {
            quit_key: ctrl(b'x'),
            ..Options::default()
        };
        let mut e = Editor::new(Viewport::new(24, 80).unwrap(), opts);
        assert_eq!(e.handle_key(Key::Char(ctrl(b'q'))), Action::Continue);
        assert_eq!(e.handle_key(Key::Char(ctrl(b'x'))), Action::Quit);
    }

    #[test]
    fn movement_keys_update_cursor() {
        let mut e = editor(24, 80);
        e.handle_key(Key::Down);
        e.handle_key(Key::Right);
        e.handle_key(Key::Right);
        assert_eq!(e.cursor(), Cursor { row: 1, col: 2 });
        e.handle_key(Key::End);
        assert_eq!(e.cursor(), Cursor { row: 1, col: 79 });
    }

    #[test]
    fn refresh_draws_cursor_position() {
        let mut e = editor(24, 80);
        for _ in 0..10 {
            e.handle_key(Key::Down);
            e.handle_key(Key::Right);
        }
        let mut out: Vec<u8> = Vec::new();
        e.refresh(&mut out).unwrap();
        assert!(out.ends_with(b"\x1b[11;11H\x1b[?25h"));
    }

    #[test]
    fn run_draws_between_keys_and_clears_on_quit() {
        let mut e = editor(5, 10);
        let mut keys = Decoder::new(SliceInput::new(b"\x1b[B\x1b[C\x11"));
        let mut out: Vec<u8> = Vec::new();
        e.run(&mut out, &mut keys).unwrap();

        let text = String::from_utf8(out).unwrap();
        // One frame per key read: before Down, before Right, before quit.
        assert_eq!(text.matches("\x1b[?25l").count(), 3);
        assert!(text.contains("\x1b[1;1H\x1b[?25h"));
        assert!(text.contains("\x1b[2;1H\x1b[?25h"));
        assert!(text.contains("\x1b[2;2H\x1b[?25h"));
        assert!(text.ends_with("\x1b[2J\x1b[H"));
        assert_eq!(e.cursor(), Cursor { row: 1, col: 1 });
    }

    #[test]
    fn run_surfaces_read_errors() {
        struct Dead;
        impl ByteSource for Dead {
            fn read_byte(&mut self) -> std::io::Result<Option<u8>> {
                Err(std::io::Error::other("gone"))
            }
        }
        let mut e = editor(5, 10);
        let err = e.run(&mut Vec::<u8>::new(), &mut Decoder::new(Dead)).unwrap_err();
        assert!(matches!(err, Error::Read(_)));
    }
}
