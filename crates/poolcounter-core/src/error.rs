//! Shared error type across poolcounter crates.

use thiserror::Error;

/// Stable error classification (used for log fields and metric labels).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Transport connect failed or timed out.
    Connection,
    /// Sending the query failed.
    Write,
    /// Reading the response failed or the deadline expired mid-read.
    Stream,
    /// A recognized value could not be parsed.
    ValueParse,
    /// Invalid configuration.
    BadConfig,
}

impl ErrorKind {
    /// String representation used in logs and the `result` label.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Connection => "connection",
            ErrorKind::Write => "write",
            ErrorKind::Stream => "stream",
            ErrorKind::ValueParse => "value_parse",
            ErrorKind::BadConfig => "bad_config",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, PoolCounterError>;

/// Unified error type used by core and exporter.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PoolCounterError {
    #[error("connect to {addr} failed: {reason}")]
    Connection { addr: String, reason: String },
    #[error("send query failed: {0}")]
    Write(String),
    #[error("read response failed: {0}")]
    Stream(String),
    #[error("cannot parse {input:?}: {reason}")]
    ValueParse { input: String, reason: String },
    #[error("bad config: {0}")]
    BadConfig(String),
}

impl PoolCounterError {
    pub(crate) fn value_parse(input: &str, reason: impl Into<String>) -> Self {
        PoolCounterError::ValueParse {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    /// Map the error to its stable kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PoolCounterError::Connection { .. } => ErrorKind::Connection,
            PoolCounterError::Write(_) => ErrorKind::Write,
            PoolCounterError::Stream(_) => ErrorKind::Stream,
            PoolCounterError::ValueParse { .. } => ErrorKind::ValueParse,
            PoolCounterError::BadConfig(_) => ErrorKind::BadConfig,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_error_has_a_scrape_label() {
        let cases = [
            (PoolCounterError::Connection { addr: "pc1:7531".into(), reason: "refused".into() }, "connection"),
            (PoolCounterError::Write("broken pipe".into()), "write"),
            (PoolCounterError::Stream("deadline exceeded".into()), "stream"),
            (PoolCounterError::value_parse("n/a", "invalid number"), "value_parse"),
            (PoolCounterError::BadConfig("listen_address".into()), "bad_config"),
        ];
        for (err, label) in cases {
            assert_eq!(err.kind().as_str(), label, "error={err}");
        }
    }
}
