// SPDX-License-Identifier: MIT
//
// Error types for the terminal core.
//
// Terminal-control, probe, read and write failures all end the process;
// `main` prints them and exits with `exit_code()`. Unrecognized escape
// sequences are not errors at all and never show up here.

use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// `tcgetattr` / `tcsetattr` failed. `op` names the call.
    #[error("{op}: {source}")]
    Terminal {
        op: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("cannot determine window size: {0}")]
    Probe(#[from] ProbeError),

    #[error("read: {0}")]
    Read(#[source] io::Error),

    #[error("write: {0}")]
    Write(#[source] io::Error),
}

impl Error {
    /// Wrap the current OS error (`errno`) for a failed terminal call.
    #[must_use]
    pub fn last_os(op: &'static str) -> Self {
        Self::Terminal {
            op,
            source: io::Error::last_os_error(),
        }
    }

    /// Process exit status for this error. Every fatal error exits with 1.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        1
    }
}

/// Why the cursor-position-report fallback could not size the viewport.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("terminal did not answer the cursor position query")]
    NoReply,

    #[error("cursor position reply does not start with ESC [")]
    BadPrefix,

    #[error("cursor position reply is missing a row or column")]
    MissingField,

    #[error("terminal reported a zero-sized window")]
    ZeroDimension,

    #[error("{0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_error_includes_op_and_os_text() {
        let err = Error::Terminal {
            op: "tcsetattr",
            source: io::Error::other("Inappropriate ioctl for device"),
        };
        assert_eq!(err.to_string(), "tcsetattr: Inappropriate ioctl for device");
    }

    #[test]
    fn probe_error_converts() {
        let err: Error = ProbeError::BadPrefix.into();
        assert_eq!(
            err.to_string(),
            "cannot determine window size: cursor position reply does not start with ESC ["
        );
    }

    #[test]
    fn every_error_exits_with_one() {
        let errors = [
            Error::last_os("tcgetattr"),
            Error::Probe(ProbeError::NoReply),
            Error::Read(io::Error::other("boom")),
            Error::Write(io::Error::other("boom")),
        ];
        for err in &errors {
            assert_eq!(err.exit_code(), 1);
        }
    }
}
