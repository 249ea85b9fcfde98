//! FTP-specific error type.

use std::fmt;

/// Categorised FTP error.
#[derive(Debug, Clone)]
pub struct FtpError {
    pub kind: FtpErrorKind,
    pub message: String,
    /// FTP reply code that triggered the error, if any.
    pub code: Option<u16>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FtpErrorKind {
    /// Socket / dial failure. Fatal to the session.
    ConnectionFailed,
    /// USER/PASS rejected.
    AuthFailed,
    /// Server answered with a reply code other than the expected one.
    ProtocolError,
    /// Unparsable PASV/EPSV/PWD/MLST/listing text.
    FormatError,
    /// I/O error on an established socket or local stream.
    IoError,
    /// Server closed the control connection.
    Disconnected,
    /// Bad address or parameter supplied by the caller.
    InvalidConfig,
}

pub type FtpResult<T> = Result<T, FtpError>;

// ── Construction helpers ─────────────────────────────────────────────

impl FtpError {
    pub fn new(kind: FtpErrorKind, msg: impl Into<String>) -> Self {
        Self {
            kind,
            message: msg.into(),
            code: None,
        }
    }

    pub fn with_code(mut self, code: u16) -> Self {
        self.code = Some(code);
        self
    }

    pub fn connection_failed(msg: impl Into<String>) -> Self {
        Self::new(FtpErrorKind::ConnectionFailed, msg)
    }

    pub fn auth_failed(code: u16, msg: impl Into<String>) -> Self {
        Self::new(FtpErrorKind::AuthFailed, msg).with_code(code)
    }

    /// Unexpected reply: carries the code and message the server sent.
    pub fn unexpected_reply(code: u16, msg: impl Into<String>) -> Self {
        Self::new(FtpErrorKind::ProtocolError, msg).with_code(code)
    }

    pub fn format(msg: impl Into<String>) -> Self {
        Self::new(FtpErrorKind::FormatError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(FtpErrorKind::IoError, msg)
    }

    pub fn disconnected(msg: impl Into<String>) -> Self {
        Self::new(FtpErrorKind::Disconnected, msg)
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::new(FtpErrorKind::InvalidConfig, msg)
    }

    pub fn is_protocol(&self) -> bool {
        self.kind == FtpErrorKind::ProtocolError
    }

    pub fn is_format(&self) -> bool {
        self.kind == FtpErrorKind::FormatError
    }
}

impl fmt::Display for FtpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(code) = self.code {
            write!(f, "[FTP {:?} {}] {}", self.kind, code, self.message)
        } else {
            write!(f, "[FTP {:?}] {}", self.kind, self.message)
        }
    }
}

impl std::error::Error for FtpError {}

impl From<std::io::Error> for FtpError {
    fn from(e: std::io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}
