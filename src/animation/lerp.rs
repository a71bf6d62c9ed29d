use crate::foundation::core::{Point, Vec2};

/// Linear interpolation between two values of the same shape.
///
/// `t = 0` yields `a`, `t = 1` yields `b`; `t` outside `[0, 1]` extrapolates, which is how
/// overshooting eases are expressed.
pub trait Lerp: Sized {
    /// Value at `t` between `a` and `b`.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        // Exact at both ends so boundary keyframes are reproduced bit-for-bit.
        if t == 0.0 {
            *a
        } else if t == 1.0 {
            *b
        } else {
            a + (b - a) * t
        }
    }
}

impl Lerp for Vec2 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Vec2::new(f64::lerp(&a.x, &b.x, t), f64::lerp(&a.y, &b.y, t))
    }
}

impl Lerp for Point {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Point::new(f64::lerp(&a.x, &b.x, t), f64::lerp(&a.y, &b.y, t))
    }
}

/// Point lists morph pairwise. Callers guarantee equal lengths (checked when a
/// timeline is compiled); any excess points of the longer list are dropped.
impl Lerp for Vec<Point> {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a.iter()
            .zip(b.iter())
            .map(|(pa, pb)| <Point as Lerp>::lerp(pa, pb, t))
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/lerp.rs"]
mod tests;
