use std::collections::BTreeMap;

use crate::foundation::core::{Point, Progress};
use crate::sequence::keyframe::ResolvedValue;

/// Fully resolved, renderable snapshot of one sequence.
///
/// Derived data: the presentation layer reads it and never mutates it.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VisualState {
    /// Progress the state was computed for.
    pub progress: Progress,
    /// Index of the segment containing `progress`.
    pub phase: usize,
    /// Raw local `t` inside that segment.
    pub local_t: f64,
    /// Parameter name to resolved value.
    pub params: BTreeMap<String, ResolvedValue>,
}

impl VisualState {
    /// Raw value of a parameter.
    pub fn get(&self, name: &str) -> Option<&ResolvedValue> {
        self.params.get(name)
    }

    /// Numeric parameter.
    pub fn scalar(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(ResolvedValue::as_scalar)
    }

    /// Point-list parameter.
    pub fn points(&self, name: &str) -> Option<&[Point]> {
        self.get(name).and_then(ResolvedValue::as_points)
    }

    /// Flag parameter.
    pub fn flag(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(ResolvedValue::as_flag)
    }

    /// Layer parameter.
    pub fn layer(&self, name: &str) -> Option<i32> {
        self.get(name).and_then(ResolvedValue::as_layer)
    }

    /// Parameter names ordered by their layer value, bottom first.
    pub fn stacking_order(&self) -> Vec<&str> {
        let mut layers: Vec<(i32, &str)> = self
            .params
            .iter()
            .filter_map(|(k, v)| v.as_layer().map(|z| (z, k.as_str())))
            .collect();
        layers.sort();
        layers.into_iter().map(|(_, k)| k).collect()
    }

    /// Numeric closeness check used for round-trip comparisons.
    pub fn approx_eq(&self, other: &VisualState, tol: f64) -> bool {
        if self.params.len() != other.params.len() {
            return false;
        }
        self.params.iter().all(|(k, a)| {
            let Some(b) = other.params.get(k) else {
                return false;
            };
            match (a, b) {
                (ResolvedValue::Scalar(x), ResolvedValue::Scalar(y)) => (x - y).abs() <= tol,
                (ResolvedValue::Points(xs), ResolvedValue::Points(ys)) => {
                    xs.len() == ys.len()
                        && xs
                            .iter()
                            .zip(ys)
                            .all(|(p, q)| (p.x - q.x).abs() <= tol && (p.y - q.y).abs() <= tol)
                }
                _ => a == b,
            }
        })
    }
}
