use thiserror::Error;

/// Errors raised while turning a request into a target path and command.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum BedmakerError {
    /// The declared input type is not one of `bedGraph`, `bigWig`, `bigBed`.
    #[error("Other conversions are not supported: '{0}' (expected one of bedGraph, bigWig, bigBed)")]
    UnsupportedConversion(String),

    /// The input path has no usable file name to derive a target from.
    #[error("Input path has no file name: '{0}'")]
    InvalidInputPath(String),
}

/// Result type alias for bedmaker-core operations.
pub type Result<T> = std::result::Result<T, BedmakerError>;
