// Precision estimation error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Precision error code constants
///
/// Error code range: 3001-3003
pub struct PrecisionErrorCodes {}

impl PrecisionErrorCodes {
    /// Fewer samples than the estimator requires
    pub const INSUFFICIENT_SAMPLES: i32 = 3001;

    /// More samples than the estimator accepts
    pub const TOO_MANY_SAMPLES: i32 = 3002;

    /// Viewport height cannot serve as a distance threshold
    pub const INVALID_VIEWPORT: i32 = 3003;
}

/// Which coordinate sequence failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleAxis {
    X,
    Y,
}

impl fmt::Display for SampleAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleAxis::X => write!(f, "x"),
            SampleAxis::Y => write!(f, "y"),
        }
    }
}

/// Log a precision error with structured context
pub fn log_precision_error(err: &PrecisionError, context: &str) {
    error!(
        "Precision error in {}: code={}, component=PrecisionEstimator, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Input validation errors raised by the precision estimator
///
/// Out-of-viewport coordinates are not errors; only malformed batches are.
///
/// Error code range: 3001-3003
#[derive(Debug, Clone, PartialEq)]
pub enum PrecisionError {
    /// A coordinate sequence is shorter than required
    InsufficientSamples {
        axis: SampleAxis,
        required: usize,
        collected: usize,
    },

    /// A coordinate sequence is longer than required
    TooManySamples {
        axis: SampleAxis,
        required: usize,
        collected: usize,
    },

    /// Viewport height is zero, negative or not finite
    InvalidViewport { width: f64, height: f64 },
}

impl ErrorCode for PrecisionError {
    fn code(&self) -> i32 {
        match self {
            PrecisionError::InsufficientSamples { .. } => PrecisionErrorCodes::INSUFFICIENT_SAMPLES,
            PrecisionError::TooManySamples { .. } => PrecisionErrorCodes::TOO_MANY_SAMPLES,
            PrecisionError::InvalidViewport { .. } => PrecisionErrorCodes::INVALID_VIEWPORT,
        }
    }

    fn message(&self) -> String {
        match self {
            PrecisionError::InsufficientSamples {
                axis,
                required,
                collected,
            } => format!(
                "Insufficient samples: need {} {}-coordinates, got {}",
                required, axis, collected
            ),
            PrecisionError::TooManySamples {
                axis,
                required,
                collected,
            } => format!(
                "Too many samples: expected {} {}-coordinates, got {}",
                required, axis, collected
            ),
            PrecisionError::InvalidViewport { width, height } => {
                format!("Invalid viewport {}x{}", width, height)
            }
        }
    }
}

impl fmt::Display for PrecisionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PrecisionError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for PrecisionError {}
