// Error types for the gaze calibration core
//
// This module defines custom error types for calibration, precision estimation,
// measurement and view operations, each carrying a stable numeric code so a
// host UI can react to them without parsing messages.

mod calibration;
mod measurement;
mod precision;
mod view;

pub use calibration::{log_calibration_error, CalibrationError, CalibrationErrorCodes};
pub use measurement::{log_measurement_error, MeasurementError, MeasurementErrorCodes};
pub use precision::{log_precision_error, PrecisionError, PrecisionErrorCodes, SampleAxis};
pub use view::{log_view_error, ViewError, ViewErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent error handling across
/// the host boundary.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
