// Progress tracking for the calibration workflow
//
// Serializable snapshot of a session, suitable for a progress bar or a
// debug overlay in the host UI.

use serde::{Deserialize, Serialize};

/// Where a calibration session stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum SessionPhase {
    /// Targets are still being clicked
    InProgress { completed: usize },
    /// All targets done; clicks are ignored until a measurement decision
    ReadyForMeasurement,
    /// Measurement accepted
    Calibrated,
}

impl SessionPhase {
    pub fn accepts_clicks(&self) -> bool {
        matches!(self, SessionPhase::InProgress { .. })
    }
}

/// Snapshot of a calibration session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationProgress {
    pub phase: SessionPhase,
    /// Targets that reached their click threshold
    pub completed_targets: usize,
    pub total_targets: usize,
    /// Click count per target, indexed by target id
    pub clicks: Vec<u32>,
    pub clicks_per_target: u32,
    pub center_revealed: bool,
}

impl CalibrationProgress {
    pub fn is_complete(&self) -> bool {
        self.completed_targets >= self.total_targets
    }

    /// Get progress percentage (0-100) over all required clicks
    pub fn percentage(&self) -> u8 {
        let required = self.total_targets as u64 * self.clicks_per_target as u64;
        if required == 0 {
            return 0;
        }
        let done: u64 = self
            .clicks
            .iter()
            .map(|&c| c.min(self.clicks_per_target) as u64)
            .sum();
        ((done as f32 / required as f32) * 100.0) as u8
    }
}
