// Calibration module - nine-target click calibration workflow
//
// This module provides three components:
// 1. CalibrationTarget: click count and visual state of one screen point
// 2. CalibrationSession: owns the nine targets and decides completion
// 3. CalibrationProgress: serializable snapshot for the host UI
//
// The calibration workflow:
// 1. Create CalibrationSession (center target hidden)
// 2. Click each outer target 5 times; the center appears after all eight
// 3. Click the center 5 times; CalibrationComplete fires once
// 4. Measure precision, then mark calibrated or reset

pub mod progress;
pub mod session;
pub mod target;

pub use progress::{CalibrationProgress, SessionPhase};
pub use session::{CalibrationSession, ClickOutcome};
pub use target::{
    CalibrationTarget, TargetColor, TargetVisual, CENTER_TARGET, DEFAULT_CLICKS_PER_TARGET,
    TARGET_COUNT,
};
