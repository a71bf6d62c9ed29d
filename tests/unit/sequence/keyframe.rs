use super::*;
use crate::foundation::core::Rect;

fn viewport(width: f64, height: f64) -> ViewportSnapshot {
    ViewportSnapshot::new(width, height, Rect::new(0.0, 1200.0, width, 1200.0 + 900.0))
}

#[test]
fn relative_lengths_follow_the_snapshot() {
    let len = Length::relative(Basis::ViewportHeight, 0.5);
    assert_eq!(len.resolve(&viewport(1000.0, 800.0)), 400.0);
    assert_eq!(len.resolve(&viewport(1000.0, 400.0)), 200.0);
    assert!(len.is_viewport_relative());
    assert!(!Length::px(3.0).is_viewport_relative());
}

#[test]
fn container_bases_read_bounds() {
    let vp = viewport(1000.0, 800.0);
    assert_eq!(Length::relative(Basis::ContainerTop, 1.0).resolve(&vp), 1200.0);
    assert_eq!(Length::relative(Basis::ContainerHeight, 1.0).resolve(&vp), 900.0);
    assert_eq!(Length::relative(Basis::ContainerWidth, 0.1).resolve(&vp), 100.0);
}

#[test]
fn responsive_picks_by_breakpoint() {
    let len = Length::responsive(768.0, Length::px(950.0), Length::px(1550.0));
    assert_eq!(len.resolve(&viewport(500.0, 800.0)), 950.0);
    assert_eq!(len.resolve(&viewport(768.0, 800.0)), 1550.0);
    assert!(len.is_viewport_relative());
}

#[test]
fn arithmetic_combinators() {
    let vp = viewport(1000.0, 800.0);
    let len = Length::relative(Basis::ViewportHeight, 1.0) + Length::px(-100.0) + Length::px(5.0);
    assert_eq!(len.resolve(&vp), 705.0);
    assert_eq!(Length::scale(2.0, Length::px(3.0)).resolve(&vp), 6.0);
    let clamped = Length::clamp(Length::px(500.0), Length::px(0.0), Length::px(120.0));
    assert_eq!(clamped.resolve(&vp), 120.0);
    let clamped = Length::clamp(Length::px(-5.0), Length::px(0.0), Length::px(120.0));
    assert_eq!(clamped.resolve(&vp), 0.0);
}

#[test]
fn validation_rejects_empty_and_non_finite() {
    assert!(Length::Min(vec![]).validate().is_err());
    assert!(Length::px(f64::NAN).validate().is_err());
    assert!(ParamValue::Points(vec![Point::new(f64::INFINITY, 0.0)]).validate().is_err());
    assert!(ParamValue::Layer(3).validate().is_ok());
}

#[test]
fn param_kinds() {
    assert_eq!(ParamValue::Scalar(1.0).kind(), ParamKind::Numeric);
    assert_eq!(
        ParamValue::Length(Length::px(1.0)).kind(),
        ParamKind::Numeric
    );
    assert_eq!(
        ParamValue::Points(vec![Point::ZERO, Point::ZERO]).kind(),
        ParamKind::Points(2)
    );
    assert_eq!(ParamKind::Points(3).to_string(), "3-point list");
}

#[test]
fn switch_points() {
    assert!(!SwitchPoint::Entry.switched(0.0, 0.0));
    assert!(SwitchPoint::Entry.switched(0.01, 0.0001));
    assert!(!SwitchPoint::Exit.switched(0.99, 0.999));
    assert!(SwitchPoint::Exit.switched(1.0, 1.0));
    assert!(SwitchPoint::At(0.5).switched(0.6, 0.5));
    assert!(!SwitchPoint::At(0.5).switched(0.6, 0.4));
    assert!(SwitchPoint::At(0.0).validate().is_err());
    assert!(SwitchPoint::At(1.0).validate().is_ok());
}

#[test]
fn keyframe_derive_overrides() {
    let base = KeyframeSpec::new("closed")
        .with("opacity", ParamValue::Scalar(0.0))
        .with("z", ParamValue::Layer(30));
    let open = base.derive("open", [("opacity".to_string(), ParamValue::Scalar(1.0))]);
    assert_eq!(open.name, "open");
    assert_eq!(open.params["opacity"], ParamValue::Scalar(1.0));
    assert_eq!(open.params["z"], ParamValue::Layer(30));
}
