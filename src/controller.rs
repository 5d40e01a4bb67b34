// CalibrationController - drives the session, tracker, view and measurement
//
// Single owner of the calibration flow on the UI side:
// 1. restart(): clear tracker data and show the eight outer targets
// 2. click(id): count clicks, restyle targets, publish events
// 3. begin_measurement(): open the sampling window once all nine are done
// 4. finish_measurement(): show the accuracy label and await a decision
// 5. accept() keeps the calibration, recalibrate() starts over
//
// View failures are cosmetic. They are logged and the flow continues.

use std::sync::Arc;

use futures::{Stream, StreamExt};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

use crate::calibration::{CalibrationSession, ClickOutcome, CENTER_TARGET, TARGET_COUNT};
use crate::config::AppConfig;
use crate::error::{
    log_calibration_error, log_measurement_error, log_view_error, CalibrationError, ErrorCode,
    MeasurementError, ViewError,
};
use crate::events::CalibrationEvent;
use crate::measurement::{MeasurementHandle, MeasurementWindow};
use crate::precision::{PrecisionResult, Viewport};
use crate::tracker::GazeSource;
use crate::view::{accuracy_label, CalibrationView, NOT_CALIBRATED_LABEL};

/// Buffered events per subscriber before it starts lagging
const EVENT_BUFFER: usize = 64;

enum MeasurementState {
    Idle,
    Running(MeasurementHandle),
    AwaitingDecision(PrecisionResult),
    /// Dismissed or failed. Only recalibrate() leaves this state.
    Abandoned,
}

pub struct CalibrationController<V: CalibrationView> {
    session: CalibrationSession,
    source: Arc<dyn GazeSource>,
    view: V,
    window: MeasurementWindow,
    measurement: MeasurementState,
    events: broadcast::Sender<CalibrationEvent>,
}

impl<V: CalibrationView> CalibrationController<V> {
    pub fn new(config: &AppConfig, source: Arc<dyn GazeSource>, view: V) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            session: CalibrationSession::new(config.calibration.clicks_per_target),
            source,
            view,
            window: MeasurementWindow::from_config(&config.measurement),
            measurement: MeasurementState::Idle,
            events,
        }
    }

    pub fn session(&self) -> &CalibrationSession {
        &self.session
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn is_measuring(&self) -> bool {
        matches!(self.measurement, MeasurementState::Running(_))
    }

    /// Result waiting for accept() or recalibrate()
    pub fn pending_result(&self) -> Option<PrecisionResult> {
        match self.measurement {
            MeasurementState::AwaitingDecision(precision) => Some(precision),
            _ => None,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CalibrationEvent> {
        self.events.subscribe()
    }

    /// Events as a stream. Lagged events are skipped.
    pub fn event_stream(&self) -> impl Stream<Item = CalibrationEvent> + Send + 'static {
        BroadcastStream::new(self.events.subscribe())
            .filter_map(|result| async move { result.ok() })
    }

    /// Start calibration from scratch
    ///
    /// Resets the accuracy label, clears tracker data and every target, and
    /// shows the outer targets with the center hidden.
    pub fn restart(&mut self) {
        self.stop_measurement();
        self.measurement = MeasurementState::Idle;

        let result = self.view.set_accuracy_label(NOT_CALIBRATED_LABEL);
        skip_view_error(result, "restart");

        self.source.clear_data();
        self.session.reset();

        let result = self.view.clear_canvas();
        skip_view_error(result, "restart");
        self.render_all_targets();

        tracing::info!("[Controller] calibration restarted");
        self.publish(CalibrationEvent::Reset);
    }

    /// Same as restart(), offered after a measurement
    pub fn recalibrate(&mut self) {
        self.restart();
    }

    /// Register a click on a target
    pub fn click(&mut self, target_id: usize) -> Result<ClickOutcome, CalibrationError> {
        let outcome = self.session.record_click(target_id)?;

        for event in &outcome.events {
            match event {
                CalibrationEvent::TargetProgress { target, .. }
                | CalibrationEvent::TargetCompleted { target, .. } => self.render_target(*target),
                CalibrationEvent::CenterRevealed { .. } => self.render_target(CENTER_TARGET),
                CalibrationEvent::CalibrationComplete => {
                    self.render_all_targets();
                    let result = self.view.clear_canvas();
                    skip_view_error(result, "click");
                }
                _ => {}
            }
        }

        for event in &outcome.events {
            self.publish(event.clone());
        }

        Ok(outcome)
    }

    /// Open the sampling window
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Arguments
    /// * `viewport` - Current viewport size; the user stares at its center
    pub fn begin_measurement(&mut self, viewport: Viewport) -> Result<(), CalibrationError> {
        self.check_measurement_start().inspect_err(|err| {
            log_calibration_error(err, "begin_measurement");
        })?;

        let handle = self.window.start(Arc::clone(&self.source), viewport);
        self.measurement = MeasurementState::Running(handle);
        self.publish(CalibrationEvent::MeasurementStarted {
            window_ms: self.window.window().as_millis() as u64,
        });
        Ok(())
    }

    fn check_measurement_start(&self) -> Result<(), CalibrationError> {
        match self.measurement {
            MeasurementState::Running(_) => return Err(CalibrationError::MeasurementPending),
            MeasurementState::AwaitingDecision(_) | MeasurementState::Abandoned => {
                return Err(CalibrationError::SessionLocked)
            }
            MeasurementState::Idle => {}
        }

        if !self.session.is_ready_for_measurement() {
            return Err(CalibrationError::NotReadyForMeasurement {
                completed: self.session.completed_targets(),
                required: TARGET_COUNT,
            });
        }
        Ok(())
    }

    /// Wait for the sampling window and show its result
    ///
    /// On success the accuracy label is updated and the controller waits for
    /// accept() or recalibrate(). On failure the label is left alone.
    /// Dropping the future leaves the window running; call it again to resume
    /// or dismiss_measurement() to cancel.
    pub async fn finish_measurement(&mut self) -> Result<PrecisionResult, MeasurementError> {
        // Handle stays in Running while awaited
        let outcome = match &mut self.measurement {
            MeasurementState::Running(handle) => handle.wait().await,
            _ => return Err(MeasurementError::NotStarted),
        };

        match outcome {
            Ok(precision) => {
                let result = self.view.set_accuracy_label(&accuracy_label(precision));
                skip_view_error(result, "finish_measurement");

                self.measurement = MeasurementState::AwaitingDecision(precision);
                self.publish(CalibrationEvent::MeasurementFinished { precision });
                Ok(precision)
            }
            Err(err) => {
                log_measurement_error(&err, "finish_measurement");
                self.measurement = MeasurementState::Abandoned;
                let event = match &err {
                    MeasurementError::Cancelled => CalibrationEvent::MeasurementCancelled,
                    other => CalibrationEvent::MeasurementFailed {
                        code: other.code(),
                        message: other.message(),
                    },
                };
                self.publish(event);
                Err(err)
            }
        }
    }

    /// Dismiss a running sampling window
    ///
    /// # Returns
    /// `true` if a window was running
    pub fn dismiss_measurement(&mut self) -> bool {
        if !self.is_measuring() {
            return false;
        }
        self.stop_measurement();
        self.measurement = MeasurementState::Abandoned;
        tracing::info!("[Controller] measurement dismissed");
        self.publish(CalibrationEvent::MeasurementCancelled);
        true
    }

    /// Keep the calibration after a finished measurement
    pub fn accept(&mut self) -> Result<PrecisionResult, CalibrationError> {
        let precision = match self.measurement {
            MeasurementState::AwaitingDecision(precision) => precision,
            _ => {
                let err = CalibrationError::NoMeasurementResult;
                log_calibration_error(&err, "accept");
                return Err(err);
            }
        };

        self.session.mark_calibrated()?;
        self.measurement = MeasurementState::Idle;

        let result = self.view.clear_canvas();
        skip_view_error(result, "accept");
        self.render_all_targets();

        tracing::info!("[Controller] calibration accepted at {}", precision);
        self.publish(CalibrationEvent::Accepted { precision });
        Ok(precision)
    }

    /// Release the tracker and forget all progress
    pub fn teardown(&mut self) {
        self.stop_measurement();
        self.measurement = MeasurementState::Idle;
        self.source.set_storing_points(false);
        self.session.reset();
        tracing::info!("[Controller] torn down");
    }

    fn stop_measurement(&mut self) {
        if let MeasurementState::Running(handle) = &mut self.measurement {
            handle.cancel();
            // Storage is off before the window task gets to run again
            self.source.set_storing_points(false);
        }
    }

    fn render_target(&mut self, id: usize) {
        if let Some(target) = self.session.target(id) {
            let visual = *target.visual();
            let result = self.view.apply_target_style(id, &visual);
            skip_view_error(result, "render_target");
        }
    }

    fn render_all_targets(&mut self) {
        for id in 0..TARGET_COUNT {
            self.render_target(id);
        }
    }

    fn publish(&self, event: CalibrationEvent) {
        tracing::debug!("[Controller] event {}", event.kind());
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}

impl<V: CalibrationView> Drop for CalibrationController<V> {
    fn drop(&mut self) {
        self.stop_measurement();
    }
}

fn skip_view_error(result: Result<(), ViewError>, context: &str) {
    if let Err(err) = result {
        log_view_error(&err, context);
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
