use super::*;

const MONOTONIC: [Ease; 10] = [
    Ease::Linear,
    Ease::InQuad,
    Ease::OutQuad,
    Ease::InOutQuad,
    Ease::InCubic,
    Ease::OutCubic,
    Ease::InOutCubic,
    Ease::InQuart,
    Ease::OutQuart,
    Ease::InOutQuart,
];

#[test]
fn endpoints_are_stable() {
    for ease in MONOTONIC.into_iter().chain([
        Ease::OutBack,
        Ease::CubicBezier {
            x1: 0.25,
            y1: 0.1,
            x2: 0.25,
            y2: 1.0,
        },
    ]) {
        assert!((ease.apply(0.0) - 0.0).abs() < 1e-12, "{ease:?}");
        assert!((ease.apply(1.0) - 1.0).abs() < 1e-12, "{ease:?}");
    }
}

#[test]
fn monotonic_spot_check() {
    for ease in MONOTONIC {
        let a = ease.apply(0.25);
        let b = ease.apply(0.5);
        let c = ease.apply(0.75);
        assert!(a < b);
        assert!(b < c);
    }
}

#[test]
fn non_overshooting_curves_stay_in_unit_range() {
    for ease in MONOTONIC {
        assert!(!ease.overshoots());
        for i in 0..=100 {
            let v = ease.apply(f64::from(i) / 100.0);
            assert!((0.0..=1.0).contains(&v), "{ease:?} at {i}: {v}");
        }
    }
}

#[test]
fn out_back_overshoots() {
    assert!(Ease::OutBack.overshoots());
    let peak = (1..100)
        .map(|i| Ease::OutBack.apply(f64::from(i) / 100.0))
        .fold(f64::MIN, f64::max);
    assert!(peak > 1.0);
}

#[test]
fn input_is_clamped() {
    assert_eq!(Ease::InQuad.apply(-3.0), 0.0);
    assert_eq!(Ease::InQuad.apply(3.0), 1.0);
    assert_eq!(Ease::Linear.apply(f64::NAN), 0.0);
}

#[test]
fn linear_bezier_is_identity() {
    let ease = Ease::CubicBezier {
        x1: 0.0,
        y1: 0.0,
        x2: 1.0,
        y2: 1.0,
    };
    for i in 0..=10 {
        let t = f64::from(i) / 10.0;
        assert!((ease.apply(t) - t).abs() < 1e-5);
    }
}

#[test]
fn bezier_validation() {
    assert!(
        !Ease::CubicBezier {
            x1: 1.5,
            y1: 0.0,
            x2: 0.5,
            y2: 1.0
        }
        .is_valid()
    );
    assert!(Ease::InOutCubic.is_valid());
}
