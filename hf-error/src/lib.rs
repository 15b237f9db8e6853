//! Error handling for the Hyperfan sensor bindings
//!
//! libsensors reports failures as negative integers and NULL pointers. This
//! crate gives them a single Rust type that callers can branch on by kind:
//!
//! - [`ErrorKind::Init`]: the library could not be brought up or reloaded
//! - [`ErrorKind::Io`]: a live call against the loaded library failed
//! - [`ErrorKind::Parse`]: a path or name did not resolve to a chip, feature
//!   or subfeature
//!
//! The message is kept verbatim so it can be shown to the user without any
//! further lookup.

use std::fmt;

/// Result type alias using SensorsError
pub type Result<T> = std::result::Result<T, SensorsError>;

/// Broad cause of a [`SensorsError`], for catch-site branching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Init,
    Io,
    Parse,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Init => "init",
            ErrorKind::Io => "io",
            ErrorKind::Parse => "parse",
        };
        f.write_str(name)
    }
}

/// Error type for all sensor operations
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SensorsError {
    /// Resource setup or reload failed
    #[error("{0}")]
    Init(String),

    /// Read, write or formatting against the loaded library failed
    #[error("{0}")]
    Io(String),

    /// No chip, feature or subfeature matched the given path or name
    #[error("{0}")]
    Parse(String),
}

impl SensorsError {
    /// Create an error of the given kind from a message
    pub fn new(kind: ErrorKind, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        match kind {
            ErrorKind::Init => Self::Init(msg),
            ErrorKind::Io => Self::Io(msg),
            ErrorKind::Parse => Self::Parse(msg),
        }
    }

    /// Create an error from a native error code.
    ///
    /// `render` is the library's own string table (`sensors_strerror`); the
    /// code is passed through untouched, sign included.
    pub fn from_code(kind: ErrorKind, code: i32, render: impl FnOnce(i32) -> String) -> Self {
        Self::new(kind, render(code))
    }

    pub fn init(msg: impl Into<String>) -> Self {
        Self::Init(msg.into())
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Init(_) => ErrorKind::Init,
            Self::Io(_) => ErrorKind::Io,
            Self::Parse(_) => ErrorKind::Parse,
        }
    }

    /// The human-readable message, without any kind prefix
    pub fn message(&self) -> &str {
        match self {
            Self::Init(msg) | Self::Io(msg) | Self::Parse(msg) => msg,
        }
    }

    pub fn is_init(&self) -> bool {
        self.kind() == ErrorKind::Init
    }

    pub fn is_io(&self) -> bool {
        self.kind() == ErrorKind::Io
    }

    pub fn is_parse(&self) -> bool {
        self.kind() == ErrorKind::Parse
    }
}
