//! Timed sampling window for precision measurement.
//!
//! The window turns on point storage in the tracker, waits for the sampling
//! period while the user stares at the center, turns storage off and scores
//! whatever the tracker kept. A dismissed window never produces a result.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::config::MeasurementConfig;
use crate::error::MeasurementError;
use crate::precision::{PrecisionEstimator, PrecisionResult, Viewport};
use crate::tracker::GazeSource;

/// Sampling window parameters
#[derive(Debug, Clone, Copy)]
pub struct MeasurementWindow {
    window: Duration,
    estimator: PrecisionEstimator,
}

impl MeasurementWindow {
    pub fn new(window: Duration, estimator: PrecisionEstimator) -> Self {
        Self { window, estimator }
    }

    pub fn from_config(config: &MeasurementConfig) -> Self {
        Self::new(
            config.sampling_window(),
            PrecisionEstimator::new(config.sample_count),
        )
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Open the sampling window on a spawned task
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Arguments
    /// * `source` - Tracker to store predictions in
    /// * `viewport` - Viewport whose center the user stares at
    pub fn start(&self, source: Arc<dyn GazeSource>, viewport: Viewport) -> MeasurementHandle {
        let (cancel_tx, cancel_rx) = oneshot::channel();
        let window = self.window;
        let estimator = self.estimator;

        tracing::info!(
            "[Measurement] sampling window opened for {} ms",
            window.as_millis()
        );

        let task = tokio::spawn(run_window(source, viewport, window, estimator, cancel_rx));

        MeasurementHandle {
            cancel_tx: Some(cancel_tx),
            task,
        }
    }

    /// Run a window to completion
    pub async fn measure(
        &self,
        source: Arc<dyn GazeSource>,
        viewport: Viewport,
    ) -> Result<PrecisionResult, MeasurementError> {
        self.start(source, viewport).outcome().await
    }
}

impl Default for MeasurementWindow {
    fn default() -> Self {
        Self::from_config(&MeasurementConfig::default())
    }
}

async fn run_window(
    source: Arc<dyn GazeSource>,
    viewport: Viewport,
    window: Duration,
    estimator: PrecisionEstimator,
    mut cancel_rx: oneshot::Receiver<()>,
) -> Result<PrecisionResult, MeasurementError> {
    source.set_storing_points(true);

    // A dropped sender counts as a dismissal too
    let cancelled = tokio::select! {
        _ = tokio::time::sleep(window) => false,
        _ = &mut cancel_rx => true,
    };

    source.set_storing_points(false);

    if cancelled {
        tracing::info!("[Measurement] sampling window dismissed");
        return Err(MeasurementError::Cancelled);
    }

    let samples = source.stored_points();
    let result = estimator.estimate(&samples, &viewport)?;
    tracing::info!("[Measurement] sampling window closed, precision {}", result);
    Ok(result)
}

/// Handle to a running sampling window
///
/// Dropping the handle dismisses the window.
pub struct MeasurementHandle {
    cancel_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<Result<PrecisionResult, MeasurementError>>,
}

impl MeasurementHandle {
    /// Dismiss the window. The outcome becomes `MeasurementError::Cancelled`
    /// unless the window had already closed.
    pub fn cancel(&mut self) {
        if let Some(tx) = self.cancel_tx.take() {
            let _ = tx.send(());
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the window to close and return its result
    pub async fn outcome(mut self) -> Result<PrecisionResult, MeasurementError> {
        self.wait().await
    }

    /// Wait in place, keeping the handle alive
    ///
    /// Dropping the returned future leaves the window running. Must not be
    /// awaited again once it has returned.
    pub(crate) async fn wait(&mut self) -> Result<PrecisionResult, MeasurementError> {
        match (&mut self.task).await {
            Ok(result) => result,
            Err(err) if err.is_cancelled() => Err(MeasurementError::Cancelled),
            Err(err) => Err(MeasurementError::TaskFailed {
                reason: err.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PrecisionError;
    use crate::precision::GazePoint;
    use crate::tracker::{spawn_synthetic_feed, StoredPointBuffer, SyntheticFeedConfig};

    fn viewport() -> Viewport {
        Viewport::new(1000.0, 800.0)
    }

    fn feed_at(buffer: &Arc<StoredPointBuffer>, point: GazePoint) -> JoinHandle<()> {
        let config = SyntheticFeedConfig::new(point).with_interval(Duration::from_millis(50));
        spawn_synthetic_feed(Arc::clone(buffer), config)
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_measures_centered_gaze() {
        let buffer = Arc::new(StoredPointBuffer::default());
        let feed = feed_at(&buffer, GazePoint::new(500.0, 400.0));

        let result = MeasurementWindow::default()
            .measure(buffer.clone(), viewport())
            .await;
        feed.abort();

        assert_eq!(result.unwrap().percent(), 100);
        assert!(!buffer.is_storing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_too_short_reports_insufficient_samples() {
        let buffer = Arc::new(StoredPointBuffer::default());
        let feed = feed_at(&buffer, GazePoint::new(500.0, 400.0));

        // 500 ms at 50 ms cadence stores about 10 points
        let window = MeasurementWindow::new(
            Duration::from_millis(500),
            PrecisionEstimator::default(),
        );
        let result = window.measure(buffer.clone(), viewport()).await;
        feed.abort();

        assert!(matches!(
            result,
            Err(MeasurementError::Precision(
                PrecisionError::InsufficientSamples { .. }
            ))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_before_window_closes() {
        let buffer = Arc::new(StoredPointBuffer::default());
        let feed = feed_at(&buffer, GazePoint::new(500.0, 400.0));

        let mut handle = MeasurementWindow::default().start(buffer.clone(), viewport());
        tokio::time::sleep(Duration::from_millis(1_000)).await;
        assert!(buffer.is_storing());

        handle.cancel();
        let result = handle.outcome().await;
        feed.abort();

        assert_eq!(result, Err(MeasurementError::Cancelled));
        assert!(!buffer.is_storing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handle_stops_storing() {
        let buffer = Arc::new(StoredPointBuffer::default());

        let handle = MeasurementWindow::default().start(buffer.clone(), viewport());
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(buffer.is_storing());

        drop(handle);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!buffer.is_storing());
    }
}
