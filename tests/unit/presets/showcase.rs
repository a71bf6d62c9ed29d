use super::*;
use crate::foundation::core::{Progress, Rect};
use crate::phase::mapper::PhaseMapper;
use crate::viewport::metrics::ViewportSnapshot;

#[test]
fn cards_drift_through_the_viewport() {
    let config = showcase_parallax();
    let tl = config.compile().unwrap();
    let snap = ViewportSnapshot::new(1280.0, 800.0, Rect::new(0.0, 1000.0, 1280.0, 1600.0));

    let at = |p: f64| PhaseMapper::compute_visual_state(Progress::new(p), &tl, &snap).unwrap();
    let enter = at(0.0);
    let exit = at(1.0);
    let mid = at(0.5);
    for (i, drift) in CARD_DRIFT.iter().enumerate() {
        let name = format!("card_{i}_y");
        assert_eq!(enter.scalar(&name), Some(*drift));
        assert_eq!(exit.scalar(&name), Some(-drift));
        assert!(mid.scalar(&name).unwrap().abs() < 1e-9);
    }
}

#[test]
fn range_spans_start_end_to_end_start() {
    let snap = ViewportSnapshot::new(1280.0, 800.0, Rect::new(0.0, 1000.0, 1280.0, 1600.0));
    match showcase_parallax().input {
        InputMode::ScrollLinked(cfg) => assert_eq!(cfg.range.resolve(&snap), (200.0, 1600.0)),
        other => panic!("unexpected input {other:?}"),
    }
}

#[test]
fn never_pins() {
    assert_eq!(showcase_parallax().intercept_mode(), InterceptMode::Never);
}
