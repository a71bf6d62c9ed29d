use std::collections::{BTreeMap, BTreeSet};

use crate::animation::ease::Ease;
use crate::foundation::core::Progress;
use crate::foundation::error::{ScrollPhaseError, ScrollPhaseResult};
use crate::foundation::math::{BOUNDARY_EPSILON, approx_eq, clamp01};
use crate::sequence::config::SequenceConfig;
use crate::sequence::keyframe::{ParamKind, ParamValue, SwitchPoint};

/// Validated keyframe.
#[derive(Clone, Debug, PartialEq)]
pub struct Keyframe {
    /// Keyframe name.
    pub name: String,
    /// Parameter values by name.
    pub params: BTreeMap<String, ParamValue>,
}

/// Validated segment with keyframe references resolved to indices.
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    /// Segment name.
    pub name: String,
    /// Inclusive start progress.
    pub start: f64,
    /// End progress; exclusive except for the last segment.
    pub end: f64,
    /// Index of the start keyframe.
    pub from: usize,
    /// Index of the end keyframe.
    pub to: usize,
    /// Curve applied to the local `t`.
    pub ease: Ease,
    /// Where flags and layers switch.
    pub switch: SwitchPoint,
}

impl Segment {
    /// Raw local parameter of `p` inside this segment, clamped to `[0, 1]`.
    pub fn local_t(&self, p: f64) -> f64 {
        clamp01((p - self.start) / (self.end - self.start))
    }
}

/// Result of locating a progress value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Located {
    /// Segment index.
    pub index: usize,
    /// Raw local `t` in `[0, 1]`.
    pub t: f64,
    /// True when `p` fell outside every segment and was snapped to the nearest one.
    pub out_of_range: bool,
}

/// Compiled segment schedule: ordered, gap-free, overlap-free coverage of `[0, 1]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Timeline {
    name: String,
    keyframes: Vec<Keyframe>,
    segments: Vec<Segment>,
    kinds: BTreeMap<String, ParamKind>,
    viewport_relative: bool,
}

impl Timeline {
    #[tracing::instrument(skip(config), fields(sequence = %config.name))]
    /// Validate `config` and resolve keyframe references.
    pub fn compile(config: &SequenceConfig) -> ScrollPhaseResult<Self> {
        let keyframes = compile_keyframes(config)?;
        let kinds = param_kinds(&keyframes)?;
        let segments = compile_segments(config, &keyframes)?;
        let viewport_relative = keyframes
            .iter()
            .flat_map(|k| k.params.values())
            .any(ParamValue::is_viewport_relative);

        Ok(Self {
            name: config.name.clone(),
            keyframes,
            segments,
            kinds,
            viewport_relative,
        })
    }

    /// Sequence name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Keyframes in declaration order.
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// Segments in progress order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments, which is also the number of phases.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Interpolation class of a parameter.
    pub fn param_kind(&self, name: &str) -> Option<ParamKind> {
        self.kinds.get(name).copied()
    }

    /// Whether any keyframe parameter must be resolved against a viewport snapshot.
    pub fn is_viewport_relative(&self) -> bool {
        self.viewport_relative
    }

    /// Index of the keyframe called `name`.
    pub fn keyframe_index(&self, name: &str) -> Option<usize> {
        self.keyframes.iter().position(|k| k.name == name)
    }

    /// Segment containing `p`. Intervals are `[start, end)` except the last, which is closed.
    pub fn locate(&self, p: f64) -> Located {
        let last = self.segments.len() - 1;
        if p.is_nan() || p < self.segments[0].start {
            return Located {
                index: 0,
                t: 0.0,
                out_of_range: true,
            };
        }
        if p > self.segments[last].end {
            return Located {
                index: last,
                t: 1.0,
                out_of_range: true,
            };
        }
        let idx = self.segments.partition_point(|s| s.start <= p);
        let index = idx.saturating_sub(1).min(last);
        Located {
            index,
            t: self.segments[index].local_t(p),
            out_of_range: false,
        }
    }

    /// Phase index for `progress`; always `< segment_count()`.
    pub fn phase_of(&self, progress: Progress) -> usize {
        self.locate(progress.get()).index
    }

    /// Progress at a phase boundary. `index == segment_count()` names the terminal boundary.
    pub fn boundary(&self, index: usize) -> Option<Progress> {
        if index < self.segments.len() {
            Some(Progress::new(self.segments[index].start))
        } else if index == self.segments.len() {
            Some(Progress::END)
        } else {
            None
        }
    }
}

fn compile_keyframes(config: &SequenceConfig) -> ScrollPhaseResult<Vec<Keyframe>> {
    if config.keyframes.is_empty() {
        return Err(ScrollPhaseError::config("sequence has no keyframes"));
    }
    let mut seen = BTreeSet::new();
    let mut out = Vec::with_capacity(config.keyframes.len());
    for spec in &config.keyframes {
        if !seen.insert(spec.name.as_str()) {
            return Err(ScrollPhaseError::config(format!(
                "duplicate keyframe '{}'",
                spec.name
            )));
        }
        for (param, value) in &spec.params {
            value.validate().map_err(|e| {
                ScrollPhaseError::config(format!("keyframe '{}' param '{param}': {e}", spec.name))
            })?;
        }
        out.push(Keyframe {
            name: spec.name.clone(),
            params: spec.params.clone(),
        });
    }
    Ok(out)
}

fn param_kinds(keyframes: &[Keyframe]) -> ScrollPhaseResult<BTreeMap<String, ParamKind>> {
    let mut kinds: BTreeMap<String, ParamKind> = BTreeMap::new();
    for kf in keyframes {
        for (param, value) in &kf.params {
            let kind = value.kind();
            match kinds.get(param) {
                Some(existing) if *existing != kind => {
                    return Err(ScrollPhaseError::config(format!(
                        "param '{param}' is {existing} elsewhere but {kind} in keyframe '{}'",
                        kf.name
                    )));
                }
                Some(_) => {}
                None => {
                    kinds.insert(param.clone(), kind);
                }
            }
        }
    }
    for kf in keyframes {
        if let Some(missing) = kinds.keys().find(|p| !kf.params.contains_key(*p)) {
            return Err(ScrollPhaseError::config(format!(
                "keyframe '{}' does not define param '{missing}'",
                kf.name
            )));
        }
    }
    Ok(kinds)
}

fn compile_segments(
    config: &SequenceConfig,
    keyframes: &[Keyframe],
) -> ScrollPhaseResult<Vec<Segment>> {
    if config.segments.is_empty() {
        return Err(ScrollPhaseError::config("sequence has no segments"));
    }
    let lookup = |name: &str, segment: &str| {
        keyframes
            .iter()
            .position(|k| k.name == name)
            .ok_or_else(|| {
                ScrollPhaseError::config(format!(
                    "segment '{segment}' references unknown keyframe '{name}'"
                ))
            })
    };

    let mut out: Vec<Segment> = Vec::with_capacity(config.segments.len());
    for spec in &config.segments {
        if !(spec.start.is_finite() && spec.end.is_finite()) || spec.start >= spec.end {
            return Err(ScrollPhaseError::config(format!(
                "segment '{}' has an empty or inverted interval [{}, {})",
                spec.name, spec.start, spec.end
            )));
        }
        if !spec.ease.is_valid() {
            return Err(ScrollPhaseError::config(format!(
                "segment '{}' has an invalid ease",
                spec.name
            )));
        }
        spec.switch.validate()?;

        let mut start = spec.start;
        match out.last() {
            None => {
                if !approx_eq(start, 0.0) {
                    return Err(ScrollPhaseError::config(format!(
                        "first segment '{}' starts at {start}, not 0",
                        spec.name
                    )));
                }
                start = 0.0;
            }
            Some(prev) => {
                if start < prev.start {
                    return Err(ScrollPhaseError::config(format!(
                        "segment '{}' is out of order",
                        spec.name
                    )));
                }
                if start > prev.end + BOUNDARY_EPSILON {
                    return Err(ScrollPhaseError::config(format!(
                        "gap between '{}' and '{}' ({} .. {start})",
                        prev.name, spec.name, prev.end
                    )));
                }
                if start < prev.end - BOUNDARY_EPSILON {
                    return Err(ScrollPhaseError::config(format!(
                        "segments '{}' and '{}' overlap",
                        prev.name, spec.name
                    )));
                }
                start = prev.end;
            }
        }

        out.push(Segment {
            name: spec.name.clone(),
            start,
            end: spec.end,
            from: lookup(&spec.from, &spec.name)?,
            to: lookup(&spec.to, &spec.name)?,
            ease: spec.ease,
            switch: spec.switch,
        });
    }

    let last = out.len() - 1;
    if !approx_eq(out[last].end, 1.0) {
        return Err(ScrollPhaseError::config(format!(
            "last segment '{}' ends at {}, not 1",
            out[last].name, out[last].end
        )));
    }
    out[last].end = 1.0;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/sequence/timeline.rs"]
mod tests;
