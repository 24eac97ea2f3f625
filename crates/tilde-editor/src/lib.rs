//! # tilde-editor — Editor core for tilde
//!
//! The state the main loop carries between frames, and what it does with
//! it:
//!
//! - **[`cursor`]** — `Cursor` (row, col) and its clamped movement per key
//! - **[`view`]** — composes a full frame into one append buffer
//! - **[`options`]** — placeholder glyph, banner text, quit key
//! - **[`editor`]** — `Editor`, tying viewport, cursor and options together
//!
//! Everything that talks to the terminal device lives in `tilde-term`.

pub mod cursor;
pub mod editor;
pub mod options;
pub mod view;
