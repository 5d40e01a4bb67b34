//! Display boundary for calibration targets and the accuracy label.
//!
//! The controller pushes visual state through `CalibrationView`. A missing
//! element is reported as `ViewError::ElementMissing`, which the controller
//! logs and skips.

use std::collections::{HashMap, HashSet};

use crate::calibration::TargetVisual;
use crate::error::ViewError;
use crate::precision::PrecisionResult;

/// Label shown before a measurement has produced a result
pub const NOT_CALIBRATED_LABEL: &str = "Not yet Calibrated";

/// Element holding the accuracy label
pub const ACCURACY_ELEMENT: &str = "Accuracy";

/// Element the prediction overlay is drawn on
pub const CANVAS_ELEMENT: &str = "plotting_canvas";

/// Element name of a target. Targets are numbered from 1 on screen.
pub fn target_element(id: usize) -> String {
    format!("Pt{}", id + 1)
}

/// Accuracy label text for a measurement result
pub fn accuracy_label(precision: PrecisionResult) -> String {
    format!("Accuracy | {}%", precision.percent())
}

/// Trait implemented by hosts that draw the calibration screen.
pub trait CalibrationView: Send {
    /// Apply visibility, opacity, color and disabled state to a target
    fn apply_target_style(&mut self, id: usize, visual: &TargetVisual) -> Result<(), ViewError>;

    /// Replace the accuracy label text
    fn set_accuracy_label(&mut self, text: &str) -> Result<(), ViewError>;

    /// Clear the prediction overlay
    fn clear_canvas(&mut self) -> Result<(), ViewError>;
}

/// View without a screen. Records what it was asked to display.
#[derive(Debug, Default)]
pub struct HeadlessView {
    styles: HashMap<usize, TargetVisual>,
    label: Option<String>,
    canvas_clears: usize,
    missing: HashSet<String>,
}

impl HeadlessView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Treat `element` as absent from the page
    pub fn with_missing_element(mut self, element: impl Into<String>) -> Self {
        self.missing.insert(element.into());
        self
    }

    pub fn target_style(&self, id: usize) -> Option<&TargetVisual> {
        self.styles.get(&id)
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn canvas_clears(&self) -> usize {
        self.canvas_clears
    }

    fn require(&self, element: &str) -> Result<(), ViewError> {
        if self.missing.contains(element) {
            return Err(ViewError::ElementMissing {
                element: element.to_string(),
            });
        }
        Ok(())
    }
}

impl CalibrationView for HeadlessView {
    fn apply_target_style(&mut self, id: usize, visual: &TargetVisual) -> Result<(), ViewError> {
        self.require(&target_element(id))?;
        self.styles.insert(id, *visual);
        Ok(())
    }

    fn set_accuracy_label(&mut self, text: &str) -> Result<(), ViewError> {
        self.require(ACCURACY_ELEMENT)?;
        self.label = Some(text.to_string());
        Ok(())
    }

    fn clear_canvas(&mut self) -> Result<(), ViewError> {
        self.require(CANVAS_ELEMENT)?;
        self.canvas_clears += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_labels() {
        assert_eq!(target_element(4), "Pt5");
        assert_eq!(
            accuracy_label(PrecisionResult::from_mean(87.0)),
            "Accuracy | 87%"
        );
    }

    #[test]
    fn test_headless_records_state() {
        let mut view = HeadlessView::new();
        view.apply_target_style(0, &TargetVisual::initial(true)).unwrap();
        view.set_accuracy_label(NOT_CALIBRATED_LABEL).unwrap();
        view.clear_canvas().unwrap();

        assert_eq!(view.target_style(0), Some(&TargetVisual::initial(true)));
        assert_eq!(view.label(), Some(NOT_CALIBRATED_LABEL));
        assert_eq!(view.canvas_clears(), 1);
    }

    #[test]
    fn test_missing_element_reported() {
        let mut view = HeadlessView::new().with_missing_element(ACCURACY_ELEMENT);
        let err = view.set_accuracy_label("Accuracy | 10%").unwrap_err();
        assert_eq!(err.code(), 5001);
        assert_eq!(err.message(), "Element 'Accuracy' not found");
        assert_eq!(view.label(), None);
    }
}
