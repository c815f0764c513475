//! Error types for FSF decoding and marker queries.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Fewer bytes remain than the next field needs.
    #[error("truncated input at offset {offset}: need {needed} bytes, {remaining} remain")]
    TruncatedInput {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    #[error("unsupported FSF version {0:?}, expected \"1.1\" or \"1.3\"")]
    UnsupportedVersion(String),

    /// A declared byte length or sample count is negative.
    #[error("malformed length for {field}: {value}")]
    MalformedLength { field: &'static str, value: i32 },

    #[error("malformed header: {0}")]
    MalformedHeader(String),

    #[error("invalid UTF-8 in {field}")]
    InvalidEncoding {
        field: &'static str,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("channel {channel}: invalid sample rate {value}")]
    InvalidSampleRate { channel: usize, value: i32 },

    #[error("channel {channel}: unknown datatype {tag:?}")]
    UnknownDatatype { channel: usize, tag: String },

    /// Marker query asked for a time representation other than
    /// `relative`, `absolute` or `index`.
    #[error("invalid marker time mode {0:?}")]
    InvalidRequestMode(String),

    #[error("channel index {index} out of range, file has {count} channels")]
    ChannelOutOfRange { index: usize, count: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
