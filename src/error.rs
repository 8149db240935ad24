//! Unified error types for the event log core.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! caller's handling uniform.  Codec errors are recovered locally by the
//! ingest path (drop the sample, keep going); store errors always reach
//! the caller.

use core::fmt;
use std::io;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible operation in the crate funnels into this type.
#[derive(Debug)]
pub enum Error {
    /// A line could not be encoded or decoded.
    Codec(CodecError),
    /// The log file (or a snapshot target) could not be read or written.
    Io {
        /// The protocol step that failed.
        op: IoOp,
        path: PathBuf,
        source: io::Error,
    },
    /// `delete_last` was called on a log holding no records.
    EmptyLog,
    /// A record failed the validity rule (empty title or percentage).
    InvalidRecord,
    /// Configuration is invalid.
    Config(&'static str),
}

impl Error {
    pub(crate) fn io(op: IoOp, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            op,
            path: path.into(),
            source,
        }
    }

    /// `true` when the failure happened while swapping the rewritten file
    /// into place.  Every other failure guarantees nothing changed.
    pub fn replace_failed(&self) -> bool {
        matches!(self, Self::Io { op: IoOp::Replace, .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Codec(e) => write!(f, "codec: {e}"),
            Self::Io { op, path, source } => {
                write!(f, "io: {op} {} failed: {source}", path.display())
            }
            Self::EmptyLog => write!(f, "log holds no records"),
            Self::InvalidRecord => write!(f, "record has an empty title or percentage"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Codec(e) => Some(e),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// I/O step
// ---------------------------------------------------------------------------

/// Which step of a store operation an I/O error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOp {
    Open,
    Read,
    Append,
    WriteTemp,
    Sync,
    Replace,
    Copy,
    Cleanup,
}

impl fmt::Display for IoOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Read => write!(f, "read"),
            Self::Append => write!(f, "append"),
            Self::WriteTemp => write!(f, "write temp"),
            Self::Sync => write!(f, "sync"),
            Self::Replace => write!(f, "replace"),
            Self::Copy => write!(f, "copy"),
            Self::Cleanup => write!(f, "cleanup"),
        }
    }
}

// ---------------------------------------------------------------------------
// Codec errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    /// A field contains the field separator or the record terminator, or
    /// starts or ends with whitespace the decoder would strip.
    MalformedField { field: &'static str },
    /// Fewer fields than the format requires.
    ShortRecord { found: usize, expected: usize },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedField { field } => {
                write!(f, "field `{field}` contains a separator, terminator or edge whitespace")
            }
            Self::ShortRecord { found, expected } => {
                write!(f, "expected {expected} fields, found {found}")
            }
        }
    }
}

impl std::error::Error for CodecError {}

impl From<CodecError> for Error {
    fn from(e: CodecError) -> Self {
        Self::Codec(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
