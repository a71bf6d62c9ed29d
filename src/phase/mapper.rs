use std::collections::BTreeMap;

use crate::animation::lerp::Lerp;
use crate::foundation::core::{Point, Progress};
use crate::foundation::error::{ScrollPhaseError, ScrollPhaseResult};
use crate::sequence::keyframe::{ParamValue, ResolvedValue};
use crate::sequence::timeline::Timeline;
use crate::sequence::visual::VisualState;
use crate::viewport::metrics::ViewportSnapshot;

/// Stateless mapping from progress to visual state.
pub struct PhaseMapper;

impl PhaseMapper {
    /// Interpolate every parameter for `progress`.
    ///
    /// Numeric parameters are eased and interpolated between the segment's keyframes;
    /// flags and layers switch at the segment's switch point. Viewport-relative lengths are
    /// resolved against `viewport` on every call. Returns
    /// [`ScrollPhaseError::MeasurementNotReady`] when such lengths exist and `viewport` is
    /// not ready.
    #[tracing::instrument(level = "trace", skip(timeline, viewport), fields(sequence = timeline.name()))]
    pub fn compute_visual_state(
        progress: Progress,
        timeline: &Timeline,
        viewport: &ViewportSnapshot,
    ) -> ScrollPhaseResult<VisualState> {
        if timeline.is_viewport_relative() && !viewport.is_ready() {
            return Err(ScrollPhaseError::MeasurementNotReady);
        }

        let located = timeline.locate(progress.get());
        if located.out_of_range {
            tracing::warn!(
                progress = progress.get(),
                "progress outside every segment; using nearest boundary keyframe"
            );
        }

        let segment = &timeline.segments()[located.index];
        let from = &timeline.keyframes()[segment.from];
        let to = &timeline.keyframes()[segment.to];
        let eased = segment.ease.apply(located.t);
        let switched = segment.switch.switched(located.t, eased);

        let mut params = BTreeMap::new();
        for (name, a) in &from.params {
            let Some(b) = to.params.get(name) else {
                // Compiled timelines define every param on every keyframe.
                params.insert(name.clone(), a.resolve(viewport));
                continue;
            };
            params.insert(name.clone(), blend(a, b, eased, switched, viewport));
        }

        Ok(VisualState {
            progress,
            phase: located.index,
            local_t: located.t,
            params,
        })
    }

    /// Visual state of a single keyframe, used for static and fallback rendering.
    pub fn keyframe_state(
        params: &BTreeMap<String, ParamValue>,
        progress: Progress,
        phase: usize,
        viewport: &ViewportSnapshot,
    ) -> VisualState {
        VisualState {
            progress,
            phase,
            local_t: 0.0,
            params: params
                .iter()
                .map(|(k, v)| (k.clone(), v.resolve(viewport)))
                .collect(),
        }
    }
}

fn blend(
    a: &ParamValue,
    b: &ParamValue,
    eased: f64,
    switched: bool,
    viewport: &ViewportSnapshot,
) -> ResolvedValue {
    match (a.resolve(viewport), b.resolve(viewport)) {
        (ResolvedValue::Scalar(x), ResolvedValue::Scalar(y)) => {
            ResolvedValue::Scalar(f64::lerp(&x, &y, eased))
        }
        (ResolvedValue::Points(xs), ResolvedValue::Points(ys)) => {
            ResolvedValue::Points(Vec::<Point>::lerp(&xs, &ys, eased))
        }
        (start, end) => {
            if switched {
                end
            } else {
                start
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/phase/mapper.rs"]
mod tests;
