use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::task::JoinHandle;

use crate::precision::GazePoint;

use super::StoredPointBuffer;

/// Parameters of the synthetic prediction feed.
///
/// Stands in for the prediction engine in the CLI simulation and in tests:
/// predictions land uniformly within `jitter_px` of `center` on each axis.
#[derive(Debug, Clone)]
pub struct SyntheticFeedConfig {
    pub center: GazePoint,
    pub jitter_px: f64,
    /// Time between predictions
    pub interval: Duration,
    /// Fixed seed for reproducible runs
    pub seed: Option<u64>,
}

impl SyntheticFeedConfig {
    pub fn new(center: GazePoint) -> Self {
        Self {
            center,
            jitter_px: 0.0,
            interval: Duration::from_millis(50),
            seed: None,
        }
    }

    /// Set the jitter radius. Non-finite values are ignored.
    pub fn with_jitter(mut self, jitter_px: f64) -> Self {
        if !jitter_px.is_finite() {
            tracing::warn!("[Tracker] ignoring non-finite jitter {}", jitter_px);
            return self;
        }
        self.jitter_px = jitter_px.abs();
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

fn jittered(rng: &mut StdRng, center: GazePoint, jitter_px: f64) -> GazePoint {
    if jitter_px == 0.0 {
        return center;
    }
    GazePoint::new(
        center.x + rng.gen_range(-jitter_px..=jitter_px),
        center.y + rng.gen_range(-jitter_px..=jitter_px),
    )
}

/// Push predictions into `buffer` until the returned task is aborted
///
/// Must be called from within a tokio runtime.
pub fn spawn_synthetic_feed(
    buffer: Arc<StoredPointBuffer>,
    config: SyntheticFeedConfig,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut rng = config.rng();
        let mut ticker = tokio::time::interval(config.interval);
        loop {
            ticker.tick().await;
            let point = jittered(&mut rng, config.center, config.jitter_px);
            buffer.record_prediction(point);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::GazeSource;

    #[test]
    fn test_jitter_stays_in_bounds() {
        let config = SyntheticFeedConfig::new(GazePoint::new(500.0, 400.0))
            .with_jitter(25.0)
            .with_seed(7);
        let mut rng = config.rng();
        for _ in 0..200 {
            let p = jittered(&mut rng, config.center, config.jitter_px);
            assert!((p.x - 500.0).abs() <= 25.0);
            assert!((p.y - 400.0).abs() <= 25.0);
        }
    }

    #[test]
    fn test_negative_jitter_is_made_positive() {
        let config = SyntheticFeedConfig::new(GazePoint::new(0.0, 0.0)).with_jitter(-3.0);
        assert_eq!(config.jitter_px, 3.0);
    }

    #[test]
    fn test_non_finite_jitter_is_ignored() {
        let center = GazePoint::new(500.0, 400.0);
        let config = SyntheticFeedConfig::new(center)
            .with_jitter(5.0)
            .with_jitter(f64::NAN)
            .with_jitter(f64::INFINITY);
        assert_eq!(config.jitter_px, 5.0);

        let mut rng = config.rng();
        let p = jittered(&mut rng, config.center, config.jitter_px);
        assert!((p.x - 500.0).abs() <= 5.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_feed_fills_buffer_while_storing() {
        let buffer = Arc::new(StoredPointBuffer::default());
        buffer.set_storing_points(true);

        let config = SyntheticFeedConfig::new(GazePoint::new(10.0, 20.0))
            .with_interval(Duration::from_millis(100));
        let feed = spawn_synthetic_feed(Arc::clone(&buffer), config);

        tokio::time::sleep(Duration::from_millis(6_000)).await;
        feed.abort();

        let stored = buffer.stored_points();
        assert_eq!(stored.xs.len(), 50);
        assert!(stored.points().all(|p| p == GazePoint::new(10.0, 20.0)));
    }
}
