//! Events published while calibrating and measuring.
//!
//! Session events come back from `CalibrationSession::record_click`; the
//! controller adds measurement and decision events and fans everything out
//! over a broadcast channel.

use serde::{Deserialize, Serialize};

use crate::precision::PrecisionResult;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum CalibrationEvent {
    /// Click registered on a target that still needs more clicks
    TargetProgress {
        target: usize,
        clicks: u32,
        opacity: f32,
    },
    /// Target reached its click threshold
    TargetCompleted {
        target: usize,
        completed_targets: usize,
    },
    /// Center target became clickable
    CenterRevealed { target: usize },
    /// All nine targets are calibrated. Fires once per session.
    CalibrationComplete,
    /// Sampling window opened on the tracker
    MeasurementStarted { window_ms: u64 },
    /// Sampling window closed and produced a result
    MeasurementFinished { precision: PrecisionResult },
    /// Sampling window closed but the samples were unusable
    MeasurementFailed { code: i32, message: String },
    /// Sampling window dismissed before it closed
    MeasurementCancelled,
    /// User kept the calibration
    Accepted { precision: PrecisionResult },
    /// Calibration cleared and restarted
    Reset,
}

impl CalibrationEvent {
    /// Short name used in log lines
    pub fn kind(&self) -> &'static str {
        match self {
            CalibrationEvent::TargetProgress { .. } => "target_progress",
            CalibrationEvent::TargetCompleted { .. } => "target_completed",
            CalibrationEvent::CenterRevealed { .. } => "center_revealed",
            CalibrationEvent::CalibrationComplete => "calibration_complete",
            CalibrationEvent::MeasurementStarted { .. } => "measurement_started",
            CalibrationEvent::MeasurementFinished { .. } => "measurement_finished",
            CalibrationEvent::MeasurementFailed { .. } => "measurement_failed",
            CalibrationEvent::MeasurementCancelled => "measurement_cancelled",
            CalibrationEvent::Accepted { .. } => "accepted",
            CalibrationEvent::Reset => "reset",
        }
    }
}
