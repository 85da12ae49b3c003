//! Error types

/// Reasons a bitmap resource could not be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    #[error("resource is shorter than its 4 byte header")]
    MissingHeader,
    #[error("resource declares a zero width or height")]
    ZeroDimension,
    #[error("pixel data is {actual} bytes, header requires {expected}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Errors raised while measuring or drawing the clock face.
///
/// None of them are recoverable: a failed measurement pass or frame is
/// reported to the caller and nothing is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Measure spec carried a mode other than unspecified, exactly or at most.
    #[error("cannot measure with mode bits {0:#010x}")]
    UnsupportedMeasureMode(u32),
    #[error("failed to decode bitmap: {0}")]
    Decode(#[from] DecodeError),
    /// No bitmap is registered under the resource id.
    #[error("no resource with id {0}")]
    MissingResource(u16),
    #[error("cannot scale bitmap to {width}x{height}")]
    InvalidTargetSize { width: i32, height: i32 },
    #[error("canvas save stack is full")]
    SaveStackOverflow,
    #[error("canvas restore without matching save")]
    RestoreUnderflow,
    /// The underlying draw target rejected pixels.
    #[error("draw target error")]
    Target,
}
