// SPDX-License-Identifier: MIT
//
// tilde — a raw-mode terminal editor core.
//
// This is the main binary that wires together the crates:
//
//   tilde-term   → raw mode, window size, key decoding, frame output
//   tilde-editor → cursor movement, frame composition, the main loop
//
// Startup order matters. Raw mode goes on before anything touches the
// terminal, because the window-size fallback reads the terminal's reply
// from stdin and needs it unechoed and unbuffered. Then:
//
//   stdin → decoder → key → cursor transition
//   cursor → frame → one write() → stdout
//
// until Ctrl-Q. Every exit path (quit, fatal error, panic) goes through
// the raw-mode guard before the process exits, so the shell always gets
// its terminal back.

mod logging;

use std::process;

use tilde_editor::editor::{self, Editor};
use tilde_editor::options::Options;
use tilde_term::input::Decoder;
use tilde_term::output::TtyOutput;
use tilde_term::probe;
use tilde_term::reader::TtyInput;
use tilde_term::terminal::RawMode;

fn main() {
    let logging = logging::init();

    let code = match run() {
        Ok(()) => 0,
        Err(err) => {
            tracing::error!(error = %err, "fatal");
            eprintln!("tilde: {err}");
            err.exit_code()
        }
    };

    // process::exit skips destructors; flush the log writer first.
    drop(logging);
    process::exit(code);
}

/// Run one session. The raw-mode guard is restored before this returns.
fn run() -> tilde_term::Result<()> {
    let mut raw = RawMode::enter(libc::STDIN_FILENO)?;
    let mut out = TtyOutput::stdout();
    let mut input = TtyInput::stdin();

    let outcome = probe::probe(&mut out, &mut input, libc::STDOUT_FILENO).and_then(|viewport| {
        tracing::info!(rows = viewport.rows(), cols = viewport.cols(), "viewport");
        let mut editor = Editor::new(viewport, Options::default());
        editor.run(&mut out, &mut Decoder::new(input))
    });

    if outcome.is_err() {
        editor::clear_on_exit(&mut out);
    }

    let restored = raw.leave();
    outcome.and(restored)
}
