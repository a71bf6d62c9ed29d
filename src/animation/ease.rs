/// Easing curve applied to a segment's local `t`.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    /// No easing.
    #[default]
    Linear,
    /// `t²`.
    InQuad,
    /// Mirror of [`Ease::InQuad`].
    OutQuad,
    /// Quadratic in, then out.
    InOutQuad,
    /// `t³`.
    InCubic,
    /// Mirror of [`Ease::InCubic`].
    OutCubic,
    /// Cubic in, then out.
    InOutCubic,
    /// `t⁴`.
    InQuart,
    /// Mirror of [`Ease::InQuart`].
    OutQuart,
    /// Quartic in, then out.
    InOutQuart,
    /// Ease-out with a small overshoot past 1 before settling.
    OutBack,
    /// CSS-style cubic bezier with control points `(x1, y1)` and `(x2, y2)`.
    CubicBezier {
        /// First control point, x; must lie in `[0, 1]`.
        x1: f64,
        /// First control point, y.
        y1: f64,
        /// Second control point, x; must lie in `[0, 1]`.
        x2: f64,
        /// Second control point, y.
        y2: f64,
    },
}

const BACK_C1: f64 = 1.70158;

impl Ease {
    /// Map `t` (clamped to `[0, 1]`) through the curve. Endpoints map exactly to 0 and 1.
    /// Only [`Ease::OutBack`] and bezier curves with out-of-range `y` control points leave
    /// `[0, 1]` in between.
    pub fn apply(self, t: f64) -> f64 {
        if t.is_nan() || t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
            Self::InQuart => t.powi(4),
            Self::OutQuart => 1.0 - (1.0 - t).powi(4),
            Self::InOutQuart => {
                if t < 0.5 {
                    8.0 * t.powi(4)
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(4) / 2.0)
                }
            }
            Self::OutBack => {
                let c3 = BACK_C1 + 1.0;
                1.0 + c3 * (t - 1.0).powi(3) + BACK_C1 * (t - 1.0).powi(2)
            }
            Self::CubicBezier { x1, y1, x2, y2 } => cubic_bezier(t, x1, y1, x2, y2),
        }
    }

    /// Whether the curve may leave `[0, 1]`.
    pub fn overshoots(self) -> bool {
        match self {
            Self::OutBack => true,
            Self::CubicBezier { y1, y2, .. } => !(0.0..=1.0).contains(&y1) || !(0.0..=1.0).contains(&y2),
            _ => false,
        }
    }

    /// Bezier `x` control points must stay inside `[0, 1]` for the curve to be a function.
    pub fn is_valid(self) -> bool {
        match self {
            Self::CubicBezier { x1, y1, x2, y2 } => {
                [x1, y1, x2, y2].iter().all(|v| v.is_finite())
                    && (0.0..=1.0).contains(&x1)
                    && (0.0..=1.0).contains(&x2)
            }
            _ => true,
        }
    }
}

fn cubic_bezier(x: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    // Newton-Raphson on the x polynomial, bisection when the slope flattens out.
    let mut s = x;
    for _ in 0..8 {
        let err = bezier_axis(s, x1, x2) - x;
        if err.abs() < 1e-7 {
            return bezier_axis(s, y1, y2);
        }
        let slope = bezier_slope(s, x1, x2);
        if slope.abs() < 1e-6 {
            break;
        }
        s -= err / slope;
    }

    let (mut lo, mut hi) = (0.0, 1.0);
    s = x;
    for _ in 0..32 {
        let v = bezier_axis(s, x1, x2);
        if (v - x).abs() < 1e-7 {
            break;
        }
        if v < x {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) / 2.0;
    }
    bezier_axis(s, y1, y2)
}

fn bezier_axis(s: f64, p1: f64, p2: f64) -> f64 {
    let ms = 1.0 - s;
    3.0 * ms * ms * s * p1 + 3.0 * ms * s * s * p2 + s * s * s
}

fn bezier_slope(s: f64, p1: f64, p2: f64) -> f64 {
    let ms = 1.0 - s;
    3.0 * ms * ms * p1 + 6.0 * ms * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
