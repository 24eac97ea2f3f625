//! Editor options.
//!
//! Compile-time defaults only: tilde reads no configuration files. The
//! struct exists so tests and embedders can swap the banner or the quit key
//! without touching the render or key-handling code.

use tilde_term::input::ctrl;

/// Crate version, shown in the welcome banner.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Display and key-binding options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Drawn at the start of every row past the end of the content.
    pub placeholder: u8,

    /// Welcome text, centered a third of the way down an empty screen.
    pub banner: String,

    /// Byte that ends the session (Ctrl-Q by default).
    pub quit_key: u8,
}

impl Options {
    /// The default banner: `Tilde editor -- version <VERSION>`.
    #[must_use]
    pub fn default_banner() -> String {
        format!("Tilde editor -- version {VERSION}")
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            placeholder: b'~',
            banner: Self::default_banner(),
            quit_key: ctrl(b'q'),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opts = Options::default();
        assert_eq!(opts.placeholder, b'~');
        assert_eq!(opts.quit_key, 0x11);
        assert!(opts.banner.starts_with("Tilde editor -- version "));
        assert!(opts.banner.ends_with(VERSION));
    }
}
