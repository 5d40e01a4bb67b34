// View error types

use crate::error::ErrorCode;
use log::warn;
use std::fmt;

pub struct ViewErrorCodes {}

impl ViewErrorCodes {
    /// Expected display element is absent
    pub const ELEMENT_MISSING: i32 = 5001;
}

/// Log a view error. View errors are cosmetic, so this logs at warn level.
pub fn log_view_error(err: &ViewError, context: &str) {
    warn!(
        "View error in {}: code={}, component=CalibrationView, message={}",
        context,
        err.code(),
        err.message()
    );
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// Display element with the given name was not found
    ElementMissing { element: String },
}

impl ErrorCode for ViewError {
    fn code(&self) -> i32 {
        match self {
            ViewError::ElementMissing { .. } => ViewErrorCodes::ELEMENT_MISSING,
        }
    }

    fn message(&self) -> String {
        match self {
            ViewError::ElementMissing { element } => {
                format!("Element '{}' not found", element)
            }
        }
    }
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ViewError (code {}): {}", self.code(), self.message())
    }
}

impl std::error::Error for ViewError {}
