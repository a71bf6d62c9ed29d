use std::collections::BTreeMap;

use crate::foundation::core::Point;
use crate::foundation::error::{ScrollPhaseError, ScrollPhaseResult};
use crate::viewport::metrics::ViewportSnapshot;

/// Measurement a [`Length::Relative`] is a fraction of.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Basis {
    /// Viewport width.
    ViewportWidth,
    /// Viewport height.
    ViewportHeight,
    /// Container width.
    ContainerWidth,
    /// Container height.
    ContainerHeight,
    /// Document offset of the container's top edge.
    ContainerTop,
}

impl Basis {
    fn read(self, viewport: &ViewportSnapshot) -> f64 {
        match self {
            Self::ViewportWidth => viewport.width,
            Self::ViewportHeight => viewport.height,
            Self::ContainerWidth => viewport.container.width(),
            Self::ContainerHeight => viewport.container.height(),
            Self::ContainerTop => viewport.container.y0,
        }
    }
}

/// A length resolved against the current [`ViewportSnapshot`] on every use.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Length {
    /// Absolute pixels.
    Px(f64),
    /// `fraction * basis`.
    Relative {
        /// Measurement read from the snapshot.
        basis: Basis,
        /// Multiplier applied to it.
        fraction: f64,
    },
    /// `below` when the viewport is narrower than `breakpoint`, else `at_or_above`.
    Responsive {
        /// Viewport width in pixels.
        breakpoint: f64,
        /// Used on narrower viewports.
        below: Box<Length>,
        /// Used at or above the breakpoint.
        at_or_above: Box<Length>,
    },
    /// Sum of the operands.
    Sum(Vec<Length>),
    /// `factor * of`.
    Scale {
        /// Multiplier.
        factor: f64,
        /// Scaled length.
        of: Box<Length>,
    },
    /// Smallest operand.
    Min(Vec<Length>),
    /// Largest operand.
    Max(Vec<Length>),
}

impl Length {
    /// Absolute pixels.
    pub fn px(v: f64) -> Self {
        Self::Px(v)
    }

    /// `fraction * basis`.
    pub fn relative(basis: Basis, fraction: f64) -> Self {
        Self::Relative { basis, fraction }
    }

    /// Switch lengths at a viewport-width breakpoint.
    pub fn responsive(breakpoint: f64, below: Length, at_or_above: Length) -> Self {
        Self::Responsive {
            breakpoint,
            below: Box::new(below),
            at_or_above: Box::new(at_or_above),
        }
    }

    /// `factor * of`.
    pub fn scale(factor: f64, of: Length) -> Self {
        Self::Scale {
            factor,
            of: Box::new(of),
        }
    }

    /// `max(min, min(value, max))`.
    pub fn clamp(value: Length, min: Length, max: Length) -> Self {
        Self::Max(vec![min, Self::Min(vec![value, max])])
    }

    /// Pixels for the given snapshot.
    pub fn resolve(&self, viewport: &ViewportSnapshot) -> f64 {
        match self {
            Self::Px(v) => *v,
            Self::Relative { basis, fraction } => basis.read(viewport) * fraction,
            Self::Responsive {
                breakpoint,
                below,
                at_or_above,
            } => {
                if viewport.width < *breakpoint {
                    below.resolve(viewport)
                } else {
                    at_or_above.resolve(viewport)
                }
            }
            Self::Sum(parts) => parts.iter().map(|p| p.resolve(viewport)).sum(),
            Self::Scale { factor, of } => factor * of.resolve(viewport),
            Self::Min(parts) => parts
                .iter()
                .map(|p| p.resolve(viewport))
                .fold(f64::INFINITY, f64::min),
            Self::Max(parts) => parts
                .iter()
                .map(|p| p.resolve(viewport))
                .fold(f64::NEG_INFINITY, f64::max),
        }
    }

    /// Whether resolution reads the snapshot at all.
    pub fn is_viewport_relative(&self) -> bool {
        match self {
            Self::Px(_) => false,
            Self::Relative { .. } | Self::Responsive { .. } => true,
            Self::Scale { of, .. } => of.is_viewport_relative(),
            Self::Sum(parts) | Self::Min(parts) | Self::Max(parts) => {
                parts.iter().any(Length::is_viewport_relative)
            }
        }
    }

    /// Reject non-finite constants and empty operand lists.
    pub fn validate(&self) -> ScrollPhaseResult<()> {
        match self {
            Self::Px(v) => finite(*v, "Px"),
            Self::Relative { fraction, .. } => finite(*fraction, "Relative fraction"),
            Self::Responsive {
                breakpoint,
                below,
                at_or_above,
            } => {
                finite(*breakpoint, "Responsive breakpoint")?;
                below.validate()?;
                at_or_above.validate()
            }
            Self::Scale { factor, of } => {
                finite(*factor, "Scale factor")?;
                of.validate()
            }
            Self::Sum(parts) | Self::Min(parts) | Self::Max(parts) => {
                if parts.is_empty() {
                    return Err(ScrollPhaseError::config(
                        "Sum/Min/Max lengths need at least one operand",
                    ));
                }
                parts.iter().try_for_each(Length::validate)
            }
        }
    }
}

impl std::ops::Add for Length {
    type Output = Length;

    fn add(self, rhs: Length) -> Length {
        match self {
            Self::Sum(mut parts) => {
                parts.push(rhs);
                Self::Sum(parts)
            }
            other => Self::Sum(vec![other, rhs]),
        }
    }
}

fn finite(v: f64, what: &str) -> ScrollPhaseResult<()> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(ScrollPhaseError::config(format!("{what} must be finite")))
    }
}

/// One parameter value inside a keyframe.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ParamValue {
    /// Plain number.
    Scalar(f64),
    /// Viewport-dependent length in pixels.
    Length(Length),
    /// Point list for morphing polygons and polylines.
    Points(Vec<Point>),
    /// On/off switch, such as visibility.
    Flag(bool),
    /// Stacking order.
    Layer(i32),
}

/// Interpolation class of a parameter; keyframes must agree on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamKind {
    /// Scalars and lengths, interpolated linearly.
    Numeric,
    /// Point lists of this length, interpolated pointwise.
    Points(usize),
    /// Flags, switched at the segment's switch point.
    Flag,
    /// Layers, switched like flags.
    Layer,
}

impl std::fmt::Display for ParamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Numeric => write!(f, "numeric"),
            Self::Points(n) => write!(f, "{n}-point list"),
            Self::Flag => write!(f, "flag"),
            Self::Layer => write!(f, "layer"),
        }
    }
}

impl ParamValue {
    /// Interpolation class.
    pub fn kind(&self) -> ParamKind {
        match self {
            Self::Scalar(_) | Self::Length(_) => ParamKind::Numeric,
            Self::Points(pts) => ParamKind::Points(pts.len()),
            Self::Flag(_) => ParamKind::Flag,
            Self::Layer(_) => ParamKind::Layer,
        }
    }

    /// Whether the value changes with the viewport.
    pub fn is_viewport_relative(&self) -> bool {
        matches!(self, Self::Length(len) if len.is_viewport_relative())
    }

    /// Reject non-finite numbers.
    pub fn validate(&self) -> ScrollPhaseResult<()> {
        match self {
            Self::Scalar(v) => finite(*v, "Scalar"),
            Self::Length(len) => len.validate(),
            Self::Points(pts) => {
                if pts.iter().all(|p| p.x.is_finite() && p.y.is_finite()) {
                    Ok(())
                } else {
                    Err(ScrollPhaseError::config("Points must be finite"))
                }
            }
            Self::Flag(_) | Self::Layer(_) => Ok(()),
        }
    }

    /// Resolve against `viewport`. Numeric values collapse to [`ResolvedValue::Scalar`].
    pub fn resolve(&self, viewport: &ViewportSnapshot) -> ResolvedValue {
        match self {
            Self::Scalar(v) => ResolvedValue::Scalar(*v),
            Self::Length(len) => ResolvedValue::Scalar(len.resolve(viewport)),
            Self::Points(pts) => ResolvedValue::Points(pts.clone()),
            Self::Flag(b) => ResolvedValue::Flag(*b),
            Self::Layer(z) => ResolvedValue::Layer(*z),
        }
    }
}

/// A parameter value inside a [`crate::VisualState`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ResolvedValue {
    /// Number, in pixels for lengths.
    Scalar(f64),
    /// Interpolated point list.
    Points(Vec<Point>),
    /// Current flag.
    Flag(bool),
    /// Current stacking order.
    Layer(i32),
}

impl ResolvedValue {
    /// The number, if this is a scalar.
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    /// The points, if this is a point list.
    pub fn as_points(&self) -> Option<&[Point]> {
        match self {
            Self::Points(p) => Some(p),
            _ => None,
        }
    }

    /// The flag, if this is one.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(b) => Some(*b),
            _ => None,
        }
    }

    /// The layer, if this is one.
    pub fn as_layer(&self) -> Option<i32> {
        match self {
            Self::Layer(z) => Some(*z),
            _ => None,
        }
    }
}

/// Where inside a segment a flag or layer switches from the start to the end keyframe.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum SwitchPoint {
    /// As soon as the segment is entered (local `t > 0`).
    #[default]
    Entry,
    /// Only once the segment is complete (local `t >= 1`).
    Exit,
    /// When the eased local `t'` reaches the value, which must lie in `(0, 1]`.
    At(f64),
}

impl SwitchPoint {
    /// Reject `At` values outside `(0, 1]`.
    pub fn validate(self) -> ScrollPhaseResult<()> {
        match self {
            Self::At(x) if !(x > 0.0 && x <= 1.0) => Err(ScrollPhaseError::config(format!(
                "switch point {x} must lie in (0, 1]"
            ))),
            _ => Ok(()),
        }
    }

    /// `t` is the raw local parameter, `eased` the value after the segment ease.
    pub fn switched(self, t: f64, eased: f64) -> bool {
        match self {
            Self::Entry => t > 0.0,
            Self::Exit => t >= 1.0,
            Self::At(x) => t >= 1.0 || eased >= x,
        }
    }
}

/// A named set of target parameter values.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct KeyframeSpec {
    /// Name segments refer to.
    pub name: String,
    /// Parameter values by name.
    pub params: BTreeMap<String, ParamValue>,
}

impl KeyframeSpec {
    /// Keyframe with no parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: BTreeMap::new(),
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, param: impl Into<String>, value: ParamValue) -> Self {
        self.params.insert(param.into(), value);
        self
    }

    /// Copy of this keyframe under a new name with some parameters replaced.
    pub fn derive(
        &self,
        name: impl Into<String>,
        overrides: impl IntoIterator<Item = (String, ParamValue)>,
    ) -> Self {
        let mut out = Self {
            name: name.into(),
            params: self.params.clone(),
        };
        out.params.extend(overrides);
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/keyframe.rs"]
mod tests;
