use super::*;

#[test]
fn clamp01_handles_nan() {
    assert_eq!(clamp01(f64::NAN), 0.0);
    assert_eq!(clamp01(-2.0), 0.0);
    assert_eq!(clamp01(0.4), 0.4);
    assert_eq!(clamp01(9.0), 1.0);
}

#[test]
fn unlerp_maps_span() {
    assert_eq!(unlerp_clamped(150.0, 100.0, 200.0), 0.5);
    assert_eq!(unlerp_clamped(50.0, 100.0, 200.0), 0.0);
    assert_eq!(unlerp_clamped(250.0, 100.0, 200.0), 1.0);
}

#[test]
fn unlerp_degenerate_span_steps_at_start() {
    assert_eq!(unlerp_clamped(99.0, 100.0, 100.0), 0.0);
    assert_eq!(unlerp_clamped(100.0, 100.0, 100.0), 1.0);
    assert_eq!(unlerp_clamped(100.0, 100.0, 50.0), 1.0);
}

#[test]
fn approx_and_finite_helpers() {
    assert!(approx_eq(0.1 + 0.2, 0.3));
    assert!(!approx_eq(0.3, 0.31));
    assert_eq!(finite_or(f64::INFINITY, 2.0), 2.0);
    assert_eq!(finite_or(1.5, 2.0), 1.5);
}
