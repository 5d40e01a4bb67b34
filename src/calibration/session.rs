// CalibrationSession - click counting state machine for the nine targets
//
// The session owns every target and the derived completed-target count.
// Eight outer targets are visible from the start; the center target is
// revealed once those eight are complete. Completing the ninth target
// fires CalibrationComplete once and locks the session until it is reset
// or marked calibrated.

use crate::calibration::progress::{CalibrationProgress, SessionPhase};
use crate::calibration::target::{
    CalibrationTarget, TargetClick, CENTER_TARGET, DEFAULT_CLICKS_PER_TARGET, TARGET_COUNT,
};
use crate::error::{log_calibration_error, CalibrationError};
use crate::events::CalibrationEvent;

/// What a single click changed
#[derive(Debug, Clone, PartialEq)]
pub struct ClickOutcome {
    pub target: usize,
    /// Click count of the target after this click
    pub clicks: u32,
    /// Events raised by this click, in order
    pub events: Vec<CalibrationEvent>,
}

impl ClickOutcome {
    pub fn completed_calibration(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, CalibrationEvent::CalibrationComplete))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationSession {
    targets: Vec<CalibrationTarget>,
    clicks_per_target: u32,
    completed: usize,
    center_revealed: bool,
    phase: SessionPhase,
}

impl CalibrationSession {
    /// Create a session
    ///
    /// # Arguments
    /// * `clicks_per_target` - Clicks needed per target (values below 1 are raised to 1)
    pub fn new(clicks_per_target: u32) -> Self {
        Self {
            targets: (0..TARGET_COUNT).map(CalibrationTarget::new).collect(),
            clicks_per_target: clicks_per_target.max(1),
            completed: 0,
            center_revealed: false,
            phase: SessionPhase::InProgress { completed: 0 },
        }
    }

    /// Create with default configuration (5 clicks per target)
    pub fn new_default() -> Self {
        Self::new(DEFAULT_CLICKS_PER_TARGET)
    }

    /// Record a click on a target
    ///
    /// # Returns
    /// * `Ok(ClickOutcome)` - Click accepted (possibly ignored if the target was already complete)
    /// * `Err(CalibrationError)` - Unknown or hidden target, or session locked.
    ///   The session is unchanged and the error has been logged.
    pub fn record_click(&mut self, target_id: usize) -> Result<ClickOutcome, CalibrationError> {
        self.check_click(target_id).inspect_err(|err| {
            log_calibration_error(err, "record_click");
        })?;

        let clicks_per_target = self.clicks_per_target;
        let target = &mut self.targets[target_id];
        let click = target.register_click(clicks_per_target);
        let clicks = target.clicks();

        let mut events = Vec::new();
        match click {
            TargetClick::Progress { clicks, opacity } => {
                events.push(CalibrationEvent::TargetProgress {
                    target: target_id,
                    clicks,
                    opacity,
                });
            }
            TargetClick::Completed { .. } => {
                self.completed += 1;
                tracing::debug!(
                    "[Calibration] target {} complete ({}/{})",
                    target_id,
                    self.completed,
                    TARGET_COUNT
                );
                events.push(CalibrationEvent::TargetCompleted {
                    target: target_id,
                    completed_targets: self.completed,
                });
                self.advance(&mut events);
            }
            TargetClick::Ignored => {
                tracing::debug!("[Calibration] target {} already complete", target_id);
            }
        }

        Ok(ClickOutcome {
            target: target_id,
            clicks,
            events,
        })
    }

    fn check_click(&self, target_id: usize) -> Result<(), CalibrationError> {
        let target = self
            .targets
            .get(target_id)
            .ok_or(CalibrationError::TargetNotFound { id: target_id })?;

        if !self.phase.accepts_clicks() {
            return Err(CalibrationError::SessionLocked);
        }

        if !target.is_visible() {
            return Err(CalibrationError::TargetHidden { id: target_id });
        }

        Ok(())
    }

    /// Apply the thresholds after a target completed
    fn advance(&mut self, events: &mut Vec<CalibrationEvent>) {
        if self.completed == TARGET_COUNT - 1 && !self.center_revealed {
            self.center_revealed = true;
            self.targets[CENTER_TARGET].set_visible(true);
            tracing::info!("[Calibration] outer targets done, revealing center target");
            events.push(CalibrationEvent::CenterRevealed {
                target: CENTER_TARGET,
            });
        }

        if self.completed >= TARGET_COUNT {
            for target in self.targets.iter_mut() {
                let is_center = target.is_center();
                target.set_visible(is_center);
            }
            self.phase = SessionPhase::ReadyForMeasurement;
            tracing::info!("[Calibration] all targets calibrated, ready for measurement");
            events.push(CalibrationEvent::CalibrationComplete);
        } else {
            self.phase = SessionPhase::InProgress {
                completed: self.completed,
            };
        }
    }

    /// Clear every count and flag. Calling it twice is the same as once.
    pub fn reset(&mut self) {
        for target in self.targets.iter_mut() {
            target.reset();
        }
        self.completed = 0;
        self.center_revealed = false;
        self.phase = SessionPhase::InProgress { completed: 0 };
    }

    /// Keep the calibration after a measurement was accepted
    ///
    /// Hides every target. Only valid once all targets are complete.
    pub fn mark_calibrated(&mut self) -> Result<(), CalibrationError> {
        match self.phase {
            SessionPhase::ReadyForMeasurement | SessionPhase::Calibrated => {
                for target in self.targets.iter_mut() {
                    target.set_visible(false);
                }
                self.phase = SessionPhase::Calibrated;
                Ok(())
            }
            SessionPhase::InProgress { completed } => {
                let err = CalibrationError::NotReadyForMeasurement {
                    completed,
                    required: TARGET_COUNT,
                };
                log_calibration_error(&err, "mark_calibrated");
                Err(err)
            }
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_ready_for_measurement(&self) -> bool {
        self.phase == SessionPhase::ReadyForMeasurement
    }

    pub fn completed_targets(&self) -> usize {
        self.completed
    }

    pub fn clicks_per_target(&self) -> u32 {
        self.clicks_per_target
    }

    pub fn center_revealed(&self) -> bool {
        self.center_revealed
    }

    pub fn targets(&self) -> &[CalibrationTarget] {
        &self.targets
    }

    pub fn target(&self, id: usize) -> Option<&CalibrationTarget> {
        self.targets.get(id)
    }

    /// Get current calibration progress
    pub fn progress(&self) -> CalibrationProgress {
        CalibrationProgress {
            phase: self.phase,
            completed_targets: self.completed,
            total_targets: TARGET_COUNT,
            clicks: self.targets.iter().map(|t| t.clicks()).collect(),
            clicks_per_target: self.clicks_per_target,
            center_revealed: self.center_revealed,
        }
    }
}

impl Default for CalibrationSession {
    fn default() -> Self {
        Self::new_default()
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
