// SPDX-License-Identifier: MIT
//
// tilde-term — Terminal core for the tilde editor.
//
// Everything that touches the terminal device lives here: raw mode with a
// guaranteed restore, window-size discovery (OS query first, cursor
// position report as the fallback), byte-level input with a short read
// timeout, a table-driven decoder that turns those bytes into keys, and
// the append buffer a frame is composed into before its single write.
//
// Like its sibling crates it talks to the terminal through raw termios and
// hand-written ANSI sequences. No TUI framework sits in between.

pub mod ansi;
pub mod error;
pub mod input;
pub mod output;
pub mod probe;
pub mod reader;
pub mod terminal;

pub use error::{Error, ProbeError, Result};
