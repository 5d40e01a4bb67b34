// Value types shared by the estimator, the tracker boundary and the
// measurement window.

use serde::{Deserialize, Serialize};

/// One gaze prediction in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GazePoint {
    pub x: f64,
    pub y: f64,
}

impl GazePoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: &GazePoint) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Visible area the calibration overlay covers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Point the user stares at during measurement (viewport center)
    pub fn fixation_point(&self) -> GazePoint {
        GazePoint::new(self.width / 2.0, self.height / 2.0)
    }

    /// Distance at which a prediction scores 0%
    pub fn zero_accuracy_radius(&self) -> f64 {
        self.height / 2.0
    }
}

/// Stored predictions as handed over by the tracker
///
/// `xs[i]` and `ys[i]` belong to the same prediction; both sequences are in
/// capture order, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredPoints {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

impl StoredPoints {
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Self {
        Self { xs, ys }
    }

    /// Split a sequence of points into parallel coordinate sequences
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = GazePoint>,
    {
        let (xs, ys) = points.into_iter().map(|p| (p.x, p.y)).unzip();
        Self { xs, ys }
    }

    /// Build a batch of `count` identical predictions
    pub fn repeated(point: GazePoint, count: usize) -> Self {
        Self {
            xs: vec![point.x; count],
            ys: vec![point.y; count],
        }
    }

    /// Index-aligned pairs, stopping at the shorter sequence
    pub fn points(&self) -> impl Iterator<Item = GazePoint> + '_ {
        self.xs
            .iter()
            .zip(self.ys.iter())
            .map(|(&x, &y)| GazePoint::new(x, y))
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty() && self.ys.is_empty()
    }
}

/// Rounded accuracy percentage in [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrecisionResult(u8);

impl PrecisionResult {
    /// Round and clamp a mean percentage
    pub fn from_mean(mean: f64) -> Self {
        if !mean.is_finite() {
            return Self(0);
        }
        Self(mean.round().clamp(0.0, 100.0) as u8)
    }

    pub fn percent(&self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for PrecisionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}
