//! Error types for point cloud loading.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for load operations.
///
/// The `Display` text of each variant is the human-readable failure reason
/// handed to the consuming renderer.
#[derive(Error, Debug)]
pub enum Error {
    /// The byte stream for a path could not be opened
    #[error("could not open file: {}", .0.display())]
    StreamUnavailable(PathBuf),

    /// Unrecognized file extension or format word
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// PLY declared `binary_big_endian`
    #[error("binary big-endian not supported")]
    BigEndianUnsupported,

    /// PLY header lacks one of `x`, `y`, `z`
    #[error("missing position fields")]
    MissingPositionFields,

    /// PLY header could not be parsed
    #[error("malformed header: {0}")]
    MalformedHeader(String),

    /// SPLAT file size fits neither record layout
    #[error("size not divisible by 32 or 56")]
    SizeMismatch(u64),

    /// I/O error while reading an already opened stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse failure taxonomy, independent of the exact message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    StreamUnavailable,
    UnsupportedFormat,
    MalformedHeader,
    SizeMismatch,
}

impl Error {
    /// Create a malformed header error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedHeader(msg.into())
    }

    /// Which taxonomy bucket this error falls into.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::StreamUnavailable(_) | Self::Io(_) => ErrorKind::StreamUnavailable,
            Self::UnsupportedFormat(_) | Self::BigEndianUnsupported => ErrorKind::UnsupportedFormat,
            Self::MissingPositionFields | Self::MalformedHeader(_) => ErrorKind::MalformedHeader,
            Self::SizeMismatch(_) => ErrorKind::SizeMismatch,
        }
    }
}

/// Result type alias for load operations.
pub type Result<T> = std::result::Result<T, Error>;
