use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(String),
    Unauthorized(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Failure of a single call against the referral backend.
///
/// Every variant is routed into the same fallback branch as a "not found"
/// answer; the distinction only matters for logs and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Request never produced a response (connect, DNS, TLS...)
    Transport(String),
    /// Non-2xx status
    Status(u16),
    /// 2xx body that is not the JSON we expected
    Decode(String),
    /// 2xx body carrying an `error` field
    Backend(String),
    /// 2xx body without the record we asked for
    NotFound,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Transport(msg) => write!(f, "transport failure: {}", msg),
            ApiError::Status(code) => write!(f, "unexpected status {}", code),
            ApiError::Decode(msg) => write!(f, "invalid response body: {}", msg),
            ApiError::Backend(msg) => write!(f, "backend reported error: {}", msg),
            ApiError::NotFound => write!(f, "record not found"),
        }
    }
}

impl std::error::Error for ApiError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    /// No clipboard helper could be started on this host
    Unavailable(String),
    /// Helper started but exited unsuccessfully
    WriteFailed(String),
}

impl fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClipboardError::Unavailable(msg) => write!(f, "clipboard unavailable: {}", msg),
            ClipboardError::WriteFailed(msg) => write!(f, "clipboard write failed: {}", msg),
        }
    }
}

impl std::error::Error for ClipboardError {}
