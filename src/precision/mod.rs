// Precision estimation - accuracy percentage from a batch of predictions
//
// While the user stares at the viewport center, the tracker stores its last
// 50 predictions. Each prediction is scored by how far it lands from the
// center, with a linear falloff that reaches 0% at half the viewport height.
// The batch score is the rounded mean of the per-sample scores.

pub mod types;


pub use types::{GazePoint, PrecisionResult, StoredPoints, Viewport};

use crate::error::{PrecisionError, SampleAxis};

/// Number of predictions the tracker keeps for a measurement
pub const REQUIRED_SAMPLES: usize = 50;

/// Score one prediction against the fixation point
///
/// # Arguments
/// * `point` - Predicted gaze location
/// * `fixation` - Point the user was asked to stare at
/// * `zero_radius` - Distance at which the score reaches 0%
///
/// # Returns
/// Percentage in [0, 100]. Non-finite distances score 0.
pub fn sample_percentage(point: &GazePoint, fixation: &GazePoint, zero_radius: f64) -> f64 {
    let distance = fixation.distance_to(point);
    if distance <= zero_radius {
        100.0 - (distance / zero_radius) * 100.0
    } else {
        0.0
    }
}

/// Converts stored predictions into a single accuracy percentage
#[derive(Debug, Clone, Copy)]
pub struct PrecisionEstimator {
    required_samples: usize,
}

impl PrecisionEstimator {
    /// Create an estimator expecting `required_samples` predictions per axis
    ///
    /// Values below 1 are raised to 1.
    pub fn new(required_samples: usize) -> Self {
        Self {
            required_samples: required_samples.max(1),
        }
    }

    pub fn required_samples(&self) -> usize {
        self.required_samples
    }

    /// Estimate precision for a batch of predictions
    ///
    /// # Arguments
    /// * `samples` - Index-aligned x/y sequences from the tracker
    /// * `viewport` - Viewport the predictions were captured in
    ///
    /// # Returns
    /// * `Ok(PrecisionResult)` - Rounded mean percentage
    /// * `Err(PrecisionError)` - Wrong sequence length or unusable viewport
    pub fn estimate(
        &self,
        samples: &StoredPoints,
        viewport: &Viewport,
    ) -> Result<PrecisionResult, PrecisionError> {
        self.validate(samples, viewport)?;

        let fixation = viewport.fixation_point();
        let zero_radius = viewport.zero_accuracy_radius();

        let total: f64 = samples
            .points()
            .map(|point| sample_percentage(&point, &fixation, zero_radius))
            .sum();
        let mean = total / self.required_samples as f64;

        tracing::debug!(
            "[Precision] mean={:.2} over {} samples (fixation=({}, {}), radius={})",
            mean,
            self.required_samples,
            fixation.x,
            fixation.y,
            zero_radius
        );

        Ok(PrecisionResult::from_mean(mean))
    }

    fn validate(&self, samples: &StoredPoints, viewport: &Viewport) -> Result<(), PrecisionError> {
        if !(viewport.height.is_finite() && viewport.height > 0.0) {
            return Err(PrecisionError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }

        Self::check_axis(SampleAxis::X, samples.xs.len(), self.required_samples)?;
        Self::check_axis(SampleAxis::Y, samples.ys.len(), self.required_samples)
    }

    fn check_axis(axis: SampleAxis, collected: usize, required: usize) -> Result<(), PrecisionError> {
        if collected < required {
            return Err(PrecisionError::InsufficientSamples {
                axis,
                required,
                collected,
            });
        }
        if collected > required {
            return Err(PrecisionError::TooManySamples {
                axis,
                required,
                collected,
            });
        }
        Ok(())
    }
}

impl Default for PrecisionEstimator {
    fn default() -> Self {
        Self::new(REQUIRED_SAMPLES)
    }
}

/// Estimate precision with the default 50-sample requirement
pub fn calculate_precision(
    samples: &StoredPoints,
    viewport: &Viewport,
) -> Result<PrecisionResult, PrecisionError> {
    PrecisionEstimator::default().estimate(samples, viewport)
}
