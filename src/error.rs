//! Custom error types for design-compare.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the design-compare library.
#[derive(Error, Debug)]
pub enum Error {
    /// Input path does not resolve to a readable file.
    #[error("cannot read image file {path}: {source}")]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File content is not one of the enabled image formats.
    #[error("unsupported image format in {path}: {reason}")]
    UnsupportedFormat { path: PathBuf, reason: String },

    /// Content was recognized but could not be decoded.
    #[error("failed to decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Design and implementation rasters differ in size.
    #[error(
        "image dimensions do not match: design is {}x{}, implementation is {}x{}",
        .design.0,
        .design.1,
        .implementation.0,
        .implementation.1
    )]
    DimensionMismatch {
        design: (u32, u32),
        implementation: (u32, u32),
    },

    /// Writing the diff image to disk failed.
    #[error("failed to write diff image to {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The diff raster could not be encoded.
    #[error("failed to encode diff image: {source}")]
    Encode {
        #[source]
        source: image::ImageError,
    },

    /// Invalid parameter value.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },
}

impl Error {
    /// Classify the error for callers that only care about the failure kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::UnsupportedFormat { .. } | Self::Decode { .. } => ErrorKind::UnsupportedFormat,
            Self::DimensionMismatch { .. } => ErrorKind::DimensionMismatch,
            Self::WriteFailed { .. } => ErrorKind::WriteFailed,
            Self::InvalidParameter { .. } => ErrorKind::InvalidParameter,
            Self::Encode { .. } => ErrorKind::Internal,
        }
    }

    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Failure categories exposed across the tool boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    UnsupportedFormat,
    DimensionMismatch,
    WriteFailed,
    InvalidParameter,
    Internal,
}

impl ErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "NotFound",
            Self::UnsupportedFormat => "UnsupportedFormat",
            Self::DimensionMismatch => "DimensionMismatch",
            Self::WriteFailed => "WriteFailed",
            Self::InvalidParameter => "InvalidParameter",
            Self::Internal => "Internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result type alias for design-compare operations.
pub type Result<T> = std::result::Result<T, Error>;
