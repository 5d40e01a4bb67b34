use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gaze_calibration::calibration::{CENTER_TARGET, TARGET_COUNT};
use gaze_calibration::error::{log_precision_error, MeasurementError};
use gaze_calibration::precision::PrecisionEstimator;
use gaze_calibration::tracker::{spawn_synthetic_feed, SyntheticFeedConfig};
use gaze_calibration::{
    AppConfig, CalibrationController, CalibrationEvent, HeadlessView, StoredPointBuffer,
    StoredPoints, Viewport,
};
use serde_json::json;
use tokio::sync::broadcast;

#[derive(Parser, Debug)]
#[command(
    name = "gaze_calibration_cli",
    about = "Precision scoring and calibration simulation for the gaze calibration core"
)]
struct Cli {
    /// JSON config file (defaults are used when omitted)
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score a stored-points file against the viewport center
    Precision {
        /// JSON file of the form {"xs": [...], "ys": [...]}
        #[arg(long)]
        samples: PathBuf,
        #[arg(long)]
        width: f64,
        #[arg(long)]
        height: f64,
    },
    /// Run a full calibration against a synthetic prediction feed
    Simulate {
        #[arg(long)]
        width: f64,
        #[arg(long)]
        height: f64,
        /// Maximum prediction offset from the center on each axis
        #[arg(long, default_value_t = 0.0, value_parser = parse_jitter)]
        jitter: f64,
        /// Sampling window override
        #[arg(long)]
        window_ms: Option<u64>,
        /// Seed for reproducible jitter
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn parse_jitter(value: &str) -> Result<f64, String> {
    let jitter: f64 = value.parse().map_err(|err| format!("{err}"))?;
    if !jitter.is_finite() {
        return Err(format!("jitter must be a finite number of pixels, got {value}"));
    }
    Ok(jitter.abs())
}

fn main() -> ExitCode {
    gaze_calibration::init_logging();
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = cli
        .config
        .as_deref()
        .map(AppConfig::load_from_file)
        .unwrap_or_default();

    match cli.command {
        Commands::Precision {
            samples,
            width,
            height,
        } => run_precision(&config, &samples, Viewport::new(width, height)),
        Commands::Simulate {
            width,
            height,
            jitter,
            window_ms,
            seed,
        } => {
            let mut config = config;
            if let Some(window_ms) = window_ms {
                config.measurement.sampling_window_ms = window_ms;
            }
            run_simulate(&config, Viewport::new(width, height), jitter, seed)
        }
    }
}

fn run_precision(config: &AppConfig, path: &Path, viewport: Viewport) -> Result<ExitCode> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let samples: StoredPoints = serde_json::from_str(&contents)
        .with_context(|| format!("parsing stored points from {}", path.display()))?;

    let estimator = PrecisionEstimator::new(config.measurement.sample_count);
    match estimator.estimate(&samples, &viewport) {
        Ok(precision) => {
            println!("{}", json!({ "precision": precision }));
            Ok(ExitCode::from(0))
        }
        Err(err) => {
            log_precision_error(&err, "run_precision");
            eprintln!("{err}");
            Ok(ExitCode::from(2))
        }
    }
}

fn run_simulate(
    config: &AppConfig,
    viewport: Viewport,
    jitter: f64,
    seed: Option<u64>,
) -> Result<ExitCode> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("building tokio runtime")?;

    runtime.block_on(async {
        let buffer = Arc::new(StoredPointBuffer::new(config.measurement.sample_count));
        let mut controller = CalibrationController::new(config, buffer.clone(), HeadlessView::new());
        let mut rx = controller.subscribe();

        controller.restart();
        let order = (0..TARGET_COUNT)
            .filter(|id| *id != CENTER_TARGET)
            .chain([CENTER_TARGET]);
        for id in order {
            for _ in 0..config.calibration.clicks_per_target.max(1) {
                controller
                    .click(id)
                    .with_context(|| format!("clicking target {}", id))?;
            }
            print_events(&mut rx)?;
        }

        let mut feed_config = SyntheticFeedConfig::new(viewport.fixation_point())
            .with_jitter(jitter)
            .with_interval(feed_interval(config));
        if let Some(seed) = seed {
            feed_config = feed_config.with_seed(seed);
        }
        let feed = spawn_synthetic_feed(buffer.clone(), feed_config);

        controller
            .begin_measurement(viewport)
            .context("starting measurement")?;
        let outcome = controller.finish_measurement().await;
        feed.abort();

        let code = match outcome {
            Ok(_) => {
                controller.accept().context("accepting calibration")?;
                ExitCode::from(0)
            }
            Err(err) => {
                eprintln!("{err}");
                let code = if matches!(err, MeasurementError::TaskFailed { .. }) { 1 } else { 2 };
                ExitCode::from(code)
            }
        };
        print_events(&mut rx)?;
        controller.teardown();
        Ok::<_, anyhow::Error>(code)
    })
}

/// Predictions arrive at twice the rate needed to fill the buffer
fn feed_interval(config: &AppConfig) -> Duration {
    let window = config.measurement.sampling_window();
    let predictions = (config.measurement.sample_count.max(1) * 2) as u32;
    (window / predictions).max(Duration::from_millis(1))
}

fn print_events(rx: &mut broadcast::Receiver<CalibrationEvent>) -> Result<()> {
    while let Ok(event) = rx.try_recv() {
        println!("{}", serde_json::to_string(&event)?);
    }
    Ok(())
}
