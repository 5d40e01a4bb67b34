// Gaze Calibration Core
// Nine-target click calibration and precision estimation for webcam gaze tracking

// Module declarations
pub mod calibration;
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod measurement;
pub mod precision;
pub mod tracker;
pub mod view;

// Re-exports for convenience
pub use calibration::{CalibrationProgress, CalibrationSession, SessionPhase};
pub use config::AppConfig;
pub use controller::CalibrationController;
pub use events::CalibrationEvent;
pub use measurement::{MeasurementHandle, MeasurementWindow};
pub use precision::{calculate_precision, PrecisionEstimator, PrecisionResult, StoredPoints, Viewport};
pub use tracker::{GazeSource, StoredPointBuffer};
pub use view::{CalibrationView, HeadlessView};

/// Install a stderr fmt subscriber for `tracing` and `log` output
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(tracing::Level::INFO)
        .try_init();
}
