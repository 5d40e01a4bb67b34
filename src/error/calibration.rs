// Calibration error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Calibration error code constants
///
/// Error code range: 2001-2006
pub struct CalibrationErrorCodes {}

impl CalibrationErrorCodes {
    /// Click referenced a target index that does not exist
    pub const TARGET_NOT_FOUND: i32 = 2001;

    /// Click landed on the center target before it was revealed
    pub const TARGET_HIDDEN: i32 = 2002;

    /// Session no longer accepts clicks until it is reset
    pub const SESSION_LOCKED: i32 = 2003;

    /// Measurement requested before all targets were calibrated
    pub const NOT_READY_FOR_MEASUREMENT: i32 = 2004;

    /// A measurement window is already running
    pub const MEASUREMENT_PENDING: i32 = 2005;

    /// Accept requested without a finished measurement
    pub const NO_MEASUREMENT_RESULT: i32 = 2006;
}

/// Log a calibration error with structured context
///
/// Logs the error code, the component and the caller-supplied context.
/// Never panics.
pub fn log_calibration_error(err: &CalibrationError, context: &str) {
    error!(
        "Calibration error in {}: code={}, component=CalibrationSession, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Calibration-related errors
///
/// None of these are fatal: the session state is left untouched whenever
/// one is returned.
///
/// Error code range: 2001-2006
#[derive(Debug, Clone, PartialEq)]
pub enum CalibrationError {
    /// Click on a target index outside 0..9
    TargetNotFound { id: usize },

    /// Click on the center target while it is still hidden
    TargetHidden { id: usize },

    /// Session is waiting for measurement or already calibrated
    SessionLocked,

    /// Measurement requested while targets are still being calibrated
    NotReadyForMeasurement { completed: usize, required: usize },

    /// A measurement window is already open
    MeasurementPending,

    /// No finished measurement to accept
    NoMeasurementResult,
}

impl ErrorCode for CalibrationError {
    fn code(&self) -> i32 {
        match self {
            CalibrationError::TargetNotFound { .. } => CalibrationErrorCodes::TARGET_NOT_FOUND,
            CalibrationError::TargetHidden { .. } => CalibrationErrorCodes::TARGET_HIDDEN,
            CalibrationError::SessionLocked => CalibrationErrorCodes::SESSION_LOCKED,
            CalibrationError::NotReadyForMeasurement { .. } => {
                CalibrationErrorCodes::NOT_READY_FOR_MEASUREMENT
            }
            CalibrationError::MeasurementPending => CalibrationErrorCodes::MEASUREMENT_PENDING,
            CalibrationError::NoMeasurementResult => CalibrationErrorCodes::NO_MEASUREMENT_RESULT,
        }
    }

    fn message(&self) -> String {
        match self {
            CalibrationError::TargetNotFound { id } => {
                format!("Calibration target {} not found", id)
            }
            CalibrationError::TargetHidden { id } => {
                format!("Calibration target {} is hidden", id)
            }
            CalibrationError::SessionLocked => {
                "Calibration session is locked until reset".to_string()
            }
            CalibrationError::NotReadyForMeasurement {
                completed,
                required,
            } => {
                format!(
                    "Calibration not complete: {} of {} targets done",
                    completed, required
                )
            }
            CalibrationError::MeasurementPending => {
                "Measurement window already in progress".to_string()
            }
            CalibrationError::NoMeasurementResult => {
                "No measurement result to accept".to_string()
            }
        }
    }
}

impl fmt::Display for CalibrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CalibrationError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for CalibrationError {}
