use super::*;
use crate::calibration::{SessionPhase, TargetColor};
use crate::precision::GazePoint;
use crate::tracker::{spawn_synthetic_feed, StoredPointBuffer, SyntheticFeedConfig};
use crate::view::{HeadlessView, ACCURACY_ELEMENT, CANVAS_ELEMENT};

const OUTER_TARGETS: [usize; 8] = [0, 1, 2, 3, 5, 6, 7, 8];

fn viewport() -> Viewport {
    Viewport::new(1000.0, 800.0)
}

fn controller_with(
    config: AppConfig,
    view: HeadlessView,
) -> (CalibrationController<HeadlessView>, Arc<StoredPointBuffer>) {
    let buffer = Arc::new(StoredPointBuffer::default());
    let mut controller = CalibrationController::new(&config, buffer.clone(), view);
    controller.restart();
    (controller, buffer)
}

fn controller() -> (CalibrationController<HeadlessView>, Arc<StoredPointBuffer>) {
    controller_with(AppConfig::default(), HeadlessView::new())
}

fn complete_calibration(controller: &mut CalibrationController<HeadlessView>) {
    for id in OUTER_TARGETS.iter().copied().chain([CENTER_TARGET]) {
        for _ in 0..5 {
            controller.click(id).unwrap();
        }
    }
}

fn drain(rx: &mut broadcast::Receiver<CalibrationEvent>) -> Vec<CalibrationEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

#[test]
fn test_restart_shows_outer_targets_only() {
    let (controller, _buffer) = controller();
    let view = controller.view();

    assert_eq!(view.label(), Some(NOT_CALIBRATED_LABEL));
    for id in OUTER_TARGETS {
        assert!(view.target_style(id).unwrap().visible);
    }
    assert!(!view.target_style(CENTER_TARGET).unwrap().visible);
}

#[test]
fn test_restart_clears_tracker_data() {
    let (mut controller, buffer) = controller();
    buffer.set_storing_points(true);
    buffer.record_prediction(GazePoint::new(1.0, 1.0));
    buffer.set_storing_points(false);

    let mut rx = controller.subscribe();
    controller.restart();

    assert!(buffer.is_empty());
    assert_eq!(drain(&mut rx), vec![CalibrationEvent::Reset]);
}

#[test]
fn test_click_restyles_target() {
    let (mut controller, _buffer) = controller();
    controller.click(0).unwrap();
    controller.click(0).unwrap();

    let style = controller.view().target_style(0).unwrap();
    assert!((style.opacity - 0.6).abs() < 1e-6);
    assert_eq!(style.color, TargetColor::White);
}

#[test]
fn test_completion_leaves_only_center_visible() {
    let (mut controller, _buffer) = controller();
    let mut rx = controller.subscribe();
    complete_calibration(&mut controller);

    let view = controller.view();
    for id in OUTER_TARGETS {
        assert!(!view.target_style(id).unwrap().visible);
    }
    let center = view.target_style(CENTER_TARGET).unwrap();
    assert!(center.visible);
    assert_eq!(center.color, TargetColor::Yellow);
    assert_eq!(view.canvas_clears(), 2);

    let events = drain(&mut rx);
    let completes = events
        .iter()
        .filter(|e| matches!(e, CalibrationEvent::CalibrationComplete))
        .count();
    assert_eq!(completes, 1);
    assert!(events.contains(&CalibrationEvent::CenterRevealed {
        target: CENTER_TARGET
    }));
}

#[tokio::test]
async fn test_measurement_requires_completed_calibration() {
    let (mut controller, buffer) = controller();
    let err = controller.begin_measurement(viewport()).unwrap_err();
    assert_eq!(
        err,
        CalibrationError::NotReadyForMeasurement {
            completed: 0,
            required: 9
        }
    );
    assert!(!buffer.is_storing());
}

#[tokio::test(start_paused = true)]
async fn test_measure_and_accept() {
    let (mut controller, buffer) = controller();
    complete_calibration(&mut controller);
    let feed = spawn_synthetic_feed(
        buffer.clone(),
        SyntheticFeedConfig::new(GazePoint::new(500.0, 400.0)),
    );

    let mut rx = controller.subscribe();
    controller.begin_measurement(viewport()).unwrap();
    assert!(controller.is_measuring());
    assert_eq!(
        controller.begin_measurement(viewport()),
        Err(CalibrationError::MeasurementPending)
    );

    let precision = controller.finish_measurement().await.unwrap();
    feed.abort();

    assert_eq!(precision.percent(), 100);
    assert_eq!(controller.view().label(), Some("Accuracy | 100%"));
    assert_eq!(controller.pending_result(), Some(precision));
    assert!(!buffer.is_storing());

    assert_eq!(controller.accept(), Ok(precision));
    assert_eq!(controller.session().phase(), SessionPhase::Calibrated);
    assert!(!controller.view().target_style(CENTER_TARGET).unwrap().visible);

    assert_eq!(
        drain(&mut rx),
        vec![
            CalibrationEvent::MeasurementStarted { window_ms: 5_000 },
            CalibrationEvent::MeasurementFinished { precision },
            CalibrationEvent::Accepted { precision },
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_dismissed_measurement_never_updates_label() {
    let (mut controller, buffer) = controller();
    complete_calibration(&mut controller);

    controller.begin_measurement(viewport()).unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(1_000)).await;
    assert!(buffer.is_storing());

    assert!(controller.dismiss_measurement());
    assert!(!buffer.is_storing());
    assert!(!controller.dismiss_measurement());

    tokio::time::sleep(std::time::Duration::from_millis(10_000)).await;
    assert_eq!(controller.view().label(), Some(NOT_CALIBRATED_LABEL));
    assert_eq!(
        controller.finish_measurement().await,
        Err(MeasurementError::NotStarted)
    );
    assert_eq!(
        controller.begin_measurement(viewport()),
        Err(CalibrationError::SessionLocked)
    );

    controller.recalibrate();
    assert_eq!(controller.session().completed_targets(), 0);
    assert_eq!(controller.pending_result(), None);
}

#[tokio::test(start_paused = true)]
async fn test_short_window_reports_failure() {
    let mut config = AppConfig::default();
    config.measurement.sampling_window_ms = 500;
    let (mut controller, buffer) = controller_with(config, HeadlessView::new());
    complete_calibration(&mut controller);
    let feed = spawn_synthetic_feed(
        buffer.clone(),
        SyntheticFeedConfig::new(GazePoint::new(500.0, 400.0)),
    );

    let mut rx = controller.subscribe();
    controller.begin_measurement(viewport()).unwrap();
    let err = controller.finish_measurement().await.unwrap_err();
    feed.abort();

    assert_eq!(err.code(), 3001);
    assert_eq!(controller.view().label(), Some(NOT_CALIBRATED_LABEL));
    let events = drain(&mut rx);
    assert!(matches!(
        events.last(),
        Some(CalibrationEvent::MeasurementFailed { code: 3001, .. })
    ));
}

#[test]
fn test_accept_without_result() {
    let (mut controller, _buffer) = controller();
    complete_calibration(&mut controller);
    assert_eq!(
        controller.accept(),
        Err(CalibrationError::NoMeasurementResult)
    );
    assert_eq!(
        controller.session().phase(),
        SessionPhase::ReadyForMeasurement
    );
}

#[tokio::test(start_paused = true)]
async fn test_missing_elements_do_not_stop_calibration() {
    let view = HeadlessView::new()
        .with_missing_element("Pt5")
        .with_missing_element(ACCURACY_ELEMENT)
        .with_missing_element(CANVAS_ELEMENT);
    let (mut controller, buffer) = controller_with(AppConfig::default(), view);
    complete_calibration(&mut controller);
    assert!(controller.session().is_ready_for_measurement());

    let feed = spawn_synthetic_feed(
        buffer.clone(),
        SyntheticFeedConfig::new(GazePoint::new(500.0, 400.0)),
    );
    controller.begin_measurement(viewport()).unwrap();
    let precision = controller.finish_measurement().await.unwrap();
    feed.abort();

    assert_eq!(precision.percent(), 100);
    assert_eq!(controller.view().label(), None);
    assert_eq!(controller.view().target_style(CENTER_TARGET), None);
}

#[test]
fn test_teardown_resets_session() {
    let (mut controller, buffer) = controller();
    controller.click(0).unwrap();
    buffer.set_storing_points(true);

    controller.teardown();

    assert!(!buffer.is_storing());
    assert_eq!(controller.session().target(0).unwrap().clicks(), 0);
}

#[tokio::test]
async fn test_event_stream_delivers_events() {
    let (mut controller, _buffer) = controller();
    let mut stream = Box::pin(controller.event_stream());

    controller.click(1).unwrap();
    drop(controller);

    let first = stream.next().await;
    assert_eq!(
        first,
        Some(CalibrationEvent::TargetProgress {
            target: 1,
            clicks: 1,
            opacity: 0.4,
        })
    );
    assert_eq!(stream.next().await, None);
}

#[tokio::test(start_paused = true)]
async fn test_dropped_finish_future_leaves_window_dismissable() {
    let (mut controller, buffer) = controller();
    complete_calibration(&mut controller);
    let mut rx = controller.subscribe();
    controller.begin_measurement(viewport()).unwrap();

    let waited = tokio::time::timeout(
        std::time::Duration::from_millis(1_000),
        controller.finish_measurement(),
    )
    .await;
    assert!(waited.is_err());
    assert!(controller.is_measuring());
    assert!(buffer.is_storing());

    assert!(controller.dismiss_measurement());
    assert!(!buffer.is_storing());
    assert_eq!(
        controller.begin_measurement(viewport()),
        Err(CalibrationError::SessionLocked)
    );
    assert_eq!(
        drain(&mut rx),
        vec![
            CalibrationEvent::MeasurementStarted { window_ms: 5_000 },
            CalibrationEvent::MeasurementCancelled,
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_finish_measurement_resumes_after_timeout() {
    let (mut controller, buffer) = controller();
    complete_calibration(&mut controller);
    let feed = spawn_synthetic_feed(
        buffer.clone(),
        SyntheticFeedConfig::new(GazePoint::new(500.0, 400.0)),
    );
    controller.begin_measurement(viewport()).unwrap();

    let waited = tokio::time::timeout(
        std::time::Duration::from_millis(1_000),
        controller.finish_measurement(),
    )
    .await;
    assert!(waited.is_err());

    let precision = controller.finish_measurement().await.unwrap();
    feed.abort();

    assert_eq!(precision.percent(), 100);
    assert_eq!(controller.pending_result(), Some(precision));
}
