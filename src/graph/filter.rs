use crate::{
    dsp::filter::{FilterKind, SVFilter},
    graph::node::{GraphNode, RenderCtx},
};

/*
State-Variable Filter
=====================

Each drum voice passes its raw source through exactly one filter before the
envelope. The filter is where most of a preset's character comes from:

Lowpass: passes frequencies BELOW the cutoff.
  - Every kick preset: keeps the body, removes the click of square/triangle
    harmonics

Highpass: passes frequencies ABOVE the cutoff.
  - "metallic" hi-hat, "punchy" snare: thin, bright, no low end

Bandpass: passes frequencies AROUND the cutoff.
  - "classic"/"electronic" snare, "sharp"/"vintage" hi-hat: a focused ring

Q sets the emphasis at the cutoff. Tonal voices use Q 10 (a pronounced
ring), noise voices Q 5. See `dsp/filter.rs` for how Q maps per response.
*/

pub struct FilterNode {
    filter: SVFilter,
}

impl FilterNode {
    pub fn new(kind: FilterKind, cutoff_hz: f32) -> Self {
        Self {
            filter: SVFilter::new(kind, cutoff_hz),
        }
    }

    pub fn lowpass(cutoff_hz: f32) -> Self {
        Self::new(FilterKind::LowPass, cutoff_hz)
    }

    pub fn highpass(cutoff_hz: f32) -> Self {
        Self::new(FilterKind::HighPass, cutoff_hz)
    }

    pub fn bandpass(cutoff_hz: f32) -> Self {
        Self::new(FilterKind::BandPass, cutoff_hz)
    }

    pub fn with_q(mut self, q: f32) -> Self {
        self.filter.set_q(q);
        self
    }
}

impl GraphNode for FilterNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.filter.render(out, ctx);
    }

    fn note_on(&mut self, _ctx: &RenderCtx) {
        self.filter.reset();
    }
}
