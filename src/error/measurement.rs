// Measurement window error types and constants

use crate::error::{ErrorCode, PrecisionError};
use log::error;
use std::fmt;

/// Measurement error code constants
///
/// Error code range: 4001-4003. Precision failures keep their own 3xxx code.
pub struct MeasurementErrorCodes {}

impl MeasurementErrorCodes {
    /// Window was dismissed before it elapsed
    pub const CANCELLED: i32 = 4001;

    /// Sampling task panicked or was aborted by the runtime
    pub const TASK_FAILED: i32 = 4002;

    /// No sampling window is running
    pub const NOT_STARTED: i32 = 4003;
}

/// Log a measurement error with structured context
///
/// Cancellation is an expected user action and is logged at info level.
pub fn log_measurement_error(err: &MeasurementError, context: &str) {
    if matches!(err, MeasurementError::Cancelled) {
        log::info!("Measurement cancelled in {}", context);
        return;
    }
    error!(
        "Measurement error in {}: code={}, component=MeasurementWindow, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Errors produced while running a sampling window
#[derive(Debug, Clone, PartialEq)]
pub enum MeasurementError {
    /// The user dismissed the measurement before the window elapsed
    Cancelled,

    /// The collected samples failed validation
    Precision(PrecisionError),

    /// The sampling task did not complete
    TaskFailed { reason: String },

    /// A result was requested but no window was started
    NotStarted,
}

impl From<PrecisionError> for MeasurementError {
    fn from(err: PrecisionError) -> Self {
        MeasurementError::Precision(err)
    }
}

impl ErrorCode for MeasurementError {
    fn code(&self) -> i32 {
        match self {
            MeasurementError::Cancelled => MeasurementErrorCodes::CANCELLED,
            MeasurementError::Precision(inner) => inner.code(),
            MeasurementError::TaskFailed { .. } => MeasurementErrorCodes::TASK_FAILED,
            MeasurementError::NotStarted => MeasurementErrorCodes::NOT_STARTED,
        }
    }

    fn message(&self) -> String {
        match self {
            MeasurementError::Cancelled => "Measurement cancelled".to_string(),
            MeasurementError::Precision(inner) => inner.message(),
            MeasurementError::TaskFailed { reason } => {
                format!("Measurement task failed: {}", reason)
            }
            MeasurementError::NotStarted => "No measurement in progress".to_string(),
        }
    }
}

impl fmt::Display for MeasurementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MeasurementError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for MeasurementError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MeasurementError::Precision(inner) => Some(inner),
            _ => None,
        }
    }
}
