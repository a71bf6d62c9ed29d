/// Tolerance used when checking that segment boundaries meet.
pub(crate) const BOUNDARY_EPSILON: f64 = 1e-9;

pub(crate) fn clamp01(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

pub(crate) fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= BOUNDARY_EPSILON
}

/// `(v - start) / (end - start)`, clamped; degenerate spans step at `start`.
pub(crate) fn unlerp_clamped(v: f64, start: f64, end: f64) -> f64 {
    let span = end - start;
    if span <= 0.0 || !span.is_finite() {
        return if v < start { 0.0 } else { 1.0 };
    }
    clamp01((v - start) / span)
}

pub(crate) fn finite_or(v: f64, fallback: f64) -> f64 {
    if v.is_finite() { v } else { fallback }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
