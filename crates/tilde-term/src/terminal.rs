// SPDX-License-Identifier: MIT
//
// Terminal control — raw mode with a guaranteed restore.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr) and isatty. These are the standard POSIX interfaces for
// terminal control; there is no safe wrapper in std. Each unsafe block is
// minimal.
#![allow(unsafe_code)]
//
// `RawMode` is a scope guard. `enter` captures the current termios and
// switches the device to raw mode; `leave` (or dropping the guard) puts the
// captured settings back exactly once. `main` owns the guard for the whole
// run, so quitting, returning an error, and unwinding from a panic all pass
// through the same restore.
//
// `process::exit` does not run destructors, which is why the binary drops
// the guard before it exits. The panic hook covers the case where a panic
// aborts instead of unwinding: it restores from a global backup of the
// saved termios before the default handler prints the message.

use std::sync::{Mutex, Once};

use crate::error::{Error, Result};

/// `VTIME` in deciseconds: a read gives up after 100ms with no input.
pub const READ_TIMEOUT_DECIS: u8 = 1;

/// Check whether `fd` is connected to a terminal (TTY).
#[cfg(unix)]
#[must_use]
pub fn is_tty(fd: i32) -> bool {
    unsafe { libc::isatty(fd) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty(_fd: i32) -> bool {
    false
}

// ─── Panic-Safe Terminal Restore ────────────────────────────────────────────

/// Global backup of the original termios and its fd, for the panic hook.
///
/// [`RawMode`] owns its own copy, but the panic hook can't reach it.
#[cfg(unix)]
static TERMIOS_BACKUP: Mutex<Option<(i32, libc::termios)>> = Mutex::new(None);

/// Installs the panic hook at most once per process.
static PANIC_HOOK_INSTALLED: Once = Once::new();

/// Install a panic hook that restores the terminal before printing the error.
///
/// Without this, a panic in raw mode leaves the user's terminal broken:
/// no echo, no line editing, and a panic message smeared across the
/// screen with no carriage returns.
fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            #[cfg(unix)]
            restore_termios_from_backup();

            original(info);
        }));
    });
}

/// Restore termios from the global backup. Best-effort, ignores errors.
#[cfg(unix)]
fn restore_termios_from_backup() {
    if let Ok(guard) = TERMIOS_BACKUP.lock() {
        if let Some((fd, ref original)) = *guard {
            unsafe {
                let _ = libc::tcsetattr(fd, libc::TCSAFLUSH, original);
            }
        }
    }
}

// ─── RawMode ────────────────────────────────────────────────────────────────

/// Raw-mode guard for one terminal file descriptor.
///
/// While a `RawMode` is alive the terminal delivers every byte as typed:
/// no echo, no line buffering, no Ctrl-C/Ctrl-Z signals, no Ctrl-S/Ctrl-Q
/// flow control, no CR→NL translation on input and no NL→CRLF on output.
/// Reads return after one byte or after [`READ_TIMEOUT_DECIS`].
///
/// # Example
///
/// ```no_run
/// use tilde_term::terminal::RawMode;
///
/// let mut raw = RawMode::enter(0)?;
/// // ... draw frames, read keys ...
/// raw.leave()?; // or just let it drop
/// # Ok::<(), tilde_term::Error>(())
/// ```
pub struct RawMode {
    #[cfg_attr(not(unix), allow(dead_code))]
    fd: i32,

    /// Settings captured before entering raw mode. `None` once restored.
    #[cfg(unix)]
    original: Option<libc::termios>,
}

impl RawMode {
    /// Capture the current settings of `fd` and switch it to raw mode.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Terminal`] if the settings cannot be read (e.g. `fd`
    /// is not a terminal) or the raw settings cannot be applied. In the
    /// second case the original settings are put back before returning.
    #[cfg(unix)]
    pub fn enter(fd: i32) -> Result<Self> {
        install_panic_hook();

        let original = get_attrs(fd)?;
        let mut guard = Self {
            fd,
            original: Some(original),
        };

        if let Ok(mut backup) = TERMIOS_BACKUP.lock() {
            *backup = Some((fd, original));
        }

        let mut raw = original;
        make_raw(&mut raw);
        if let Err(err) = set_attrs(fd, &raw) {
            // Partially applied settings are possible; undo them.
            let _ = guard.leave();
            return Err(err);
        }

        tracing::info!(fd, "terminal raw mode enabled");
        Ok(guard)
    }

    #[cfg(not(unix))]
    pub fn enter(_fd: i32) -> Result<Self> {
        Err(Error::Terminal {
            op: "tcgetattr",
            source: std::io::ErrorKind::Unsupported.into(),
        })
    }

    /// Whether the original settings are still waiting to be restored.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        #[cfg(unix)]
        {
            self.original.is_some()
        }
        #[cfg(not(unix))]
        {
            false
        }
    }

    /// Restore the settings captured by [`enter`](Self::enter).
    ///
    /// The restore is attempted once. Later calls, and the drop, do nothing
    /// and return `Ok(())`, even if that one attempt failed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Terminal`] if `tcsetattr` fails.
    #[cfg(unix)]
    pub fn leave(&mut self) -> Result<()> {
        let Some(original) = self.original.take() else {
            return Ok(());
        };

        if let Ok(mut backup) = TERMIOS_BACKUP.lock() {
            *backup = None;
        }

        set_attrs(self.fd, &original)?;

        tracing::info!(fd = self.fd, "terminal raw mode disabled");
        Ok(())
    }

    #[cfg(not(unix))]
    pub fn leave(&mut self) -> Result<()> {
        Ok(())
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if let Err(err) = self.leave() {
            tracing::error!(error = %err, "failed to restore terminal");
        }
    }
}

// ── termios helpers ─────────────────────────────────────────────────────────

#[cfg(unix)]
fn get_attrs(fd: i32) -> Result<libc::termios> {
    unsafe {
        let mut termios: libc::termios = std::mem::zeroed();
        if libc::tcgetattr(fd, &raw mut termios) != 0 {
            return Err(Error::last_os("tcgetattr"));
        }
        Ok(termios)
    }
}

#[cfg(unix)]
fn set_attrs(fd: i32, termios: &libc::termios) -> Result<()> {
    unsafe {
        if libc::tcsetattr(fd, libc::TCSAFLUSH, termios) != 0 {
            return Err(Error::last_os("tcsetattr"));
        }
    }
    Ok(())
}

/// Turn `termios` into raw-mode settings.
///
/// Input: no break-to-SIGINT, no CR→NL, no parity check, no 8th-bit strip,
/// no XON/XOFF. Output: no post-processing. Control: 8-bit characters.
/// Local: no echo, no canonical mode, no Ctrl-V, no signal keys.
#[cfg(unix)]
fn make_raw(termios: &mut libc::termios) {
    termios.c_iflag &= !(libc::BRKINT | libc::ICRNL | libc::INPCK | libc::ISTRIP | libc::IXON);
    termios.c_oflag &= !libc::OPOST;
    termios.c_cflag &= !libc::CSIZE;
    termios.c_cflag |= libc::CS8;
    termios.c_lflag &= !(libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG);

    // VMIN=0, VTIME=1: read() returns after one byte or 100ms of silence.
    termios.c_cc[libc::VMIN] = 0;
    termios.c_cc[libc::VTIME] = READ_TIMEOUT_DECIS;
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn cooked() -> libc::termios {
        let mut t: libc::termios = unsafe { std::mem::zeroed() };
        t.c_iflag = libc::BRKINT | libc::ICRNL | libc::INPCK | libc::ISTRIP | libc::IXON | libc::IUTF8;
        t.c_oflag = libc::OPOST | libc::ONLCR;
        t.c_cflag = libc::CS7 | libc::CREAD;
        t.c_lflag = libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG | libc::ECHOE;
        t.c_cc[libc::VMIN] = 1;
        t.c_cc[libc::VTIME] = 0;
        t
    }

    #[test]
    fn make_raw_clears_input_processing() {
        let mut t = cooked();
        make_raw(&mut t);
        for flag in [libc::BRKINT, libc::ICRNL, libc::INPCK, libc::ISTRIP, libc::IXON] {
            assert_eq!(t.c_iflag & flag, 0);
        }
        // Flags we don't touch survive.
        assert_ne!(t.c_iflag & libc::IUTF8, 0);
    }

    #[test]
    fn make_raw_clears_output_processing() {
        let mut t = cooked();
        make_raw(&mut t);
        assert_eq!(t.c_oflag & libc::OPOST, 0);
    }

    #[test]
    fn make_raw_forces_eight_bit_chars() {
        let mut t = cooked();
        make_raw(&mut t);
        assert_eq!(t.c_cflag & libc::CSIZE, libc::CS8);
        assert_ne!(t.c_cflag & libc::CREAD, 0);
    }

    #[test]
    fn make_raw_clears_local_modes() {
        let mut t = cooked();
        make_raw(&mut t);
        for flag in [libc::ECHO, libc::ICANON, libc::IEXTEN, libc::ISIG] {
            assert_eq!(t.c_lflag & flag, 0);
        }
    }

    #[test]
    fn make_raw_sets_read_timeout() {
        let mut t = cooked();
        make_raw(&mut t);
        assert_eq!(t.c_cc[libc::VMIN], 0);
        assert_eq!(t.c_cc[libc::VTIME], 1);
    }

    #[test]
    fn enter_on_non_tty_is_a_terminal_error() {
        let mut fds = [0; 2];
        assert_eq!(unsafe { libc::pipe(fds.as_mut_ptr()) }, 0);

        let err = RawMode::enter(fds[0]).err().expect("pipe is not a tty");
        assert!(matches!(err, Error::Terminal { op: "tcgetattr", .. }));
        assert!(!is_tty(fds[0]));

        unsafe {
            libc::close(fds[0]);
            libc::close(fds[1]);
        }
    }

    #[test]
    fn is_tty_bad_fd() {
        assert!(!is_tty(-1));
    }
}
