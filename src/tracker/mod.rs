//! Boundary with the external gaze-prediction engine.
//!
//! The core never talks to the regression model or the camera. It only
//! toggles point storage, reads the stored predictions back and clears the
//! tracker's data on recalibration.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::precision::{GazePoint, StoredPoints, REQUIRED_SAMPLES};

mod synthetic;

pub use synthetic::{spawn_synthetic_feed, SyntheticFeedConfig};

/// Trait implemented by gaze trackers the calibration core can drive.
pub trait GazeSource: Send + Sync {
    /// Begin or stop storing prediction points
    fn set_storing_points(&self, storing: bool);

    /// Most recent stored predictions, oldest first
    fn stored_points(&self) -> StoredPoints;

    /// Drop stored predictions and any training data
    fn clear_data(&self);
}

/// In-memory store of the most recent predictions.
///
/// Predictions are kept only while storing is enabled, and only the last
/// `capacity` of them survive.
pub struct StoredPointBuffer {
    storing: AtomicBool,
    points: Mutex<VecDeque<GazePoint>>,
    capacity: usize,
}

impl StoredPointBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            storing: AtomicBool::new(false),
            points: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn is_storing(&self) -> bool {
        self.storing.load(Ordering::SeqCst)
    }

    /// Feed one prediction from the tracker
    ///
    /// # Returns
    /// `true` if the point was stored
    pub fn record_prediction(&self, point: GazePoint) -> bool {
        if !self.is_storing() || self.capacity == 0 {
            return false;
        }

        let mut points = self.lock_points();
        if points.len() == self.capacity {
            points.pop_front();
        }
        points.push_back(point);
        true
    }

    pub fn len(&self) -> usize {
        self.lock_points().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock_points(&self) -> std::sync::MutexGuard<'_, VecDeque<GazePoint>> {
        self.points
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for StoredPointBuffer {
    fn default() -> Self {
        Self::new(REQUIRED_SAMPLES)
    }
}

impl GazeSource for StoredPointBuffer {
    fn set_storing_points(&self, storing: bool) {
        let previous = self.storing.swap(storing, Ordering::SeqCst);
        if previous != storing {
            tracing::debug!("[Tracker] storing points: {}", storing);
        }
    }

    fn stored_points(&self) -> StoredPoints {
        StoredPoints::from_points(self.lock_points().iter().copied())
    }

    fn clear_data(&self) {
        self.lock_points().clear();
        tracing::debug!("[Tracker] stored points cleared");
    }
}
