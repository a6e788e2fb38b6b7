use crate::{
    context::FrameContext,
    event::{Event, EventClass, EventEnv, EventOutcome, EventStep},
    foundation::error::{SeqError, SeqResult},
    foundation::math::lerp_f64,
    render::composite::blit_frame_into,
    render::pool::RenderTargetPool,
    render::target::TargetId,
    timeline::Timeline,
};

/// Plays a child timeline inside a render target of the parent.
///
/// The child owns its own pool, scenes and materials, so a timeline can never contain itself.
/// Disabled until [`NestedTimelineEvent::enabled`] is called.
pub struct NestedTimelineEvent {
    child: Box<Timeline>,
    sub_start: f64,
    sub_end: f64,
    target: TargetId,
    enabled: bool,
    in_progress: bool,
}

impl NestedTimelineEvent {
    /// Maps the event's progress onto child frames `[sub_start, sub_end)`.
    pub fn new(child: Timeline, sub_start: f64, sub_end: f64, target: TargetId) -> SeqResult<Self> {
        if !(sub_start.is_finite() && sub_end.is_finite() && sub_start < sub_end) {
            return Err(SeqError::validation(format!(
                "nested sub-range must satisfy start < end, got [{sub_start}, {sub_end})"
            )));
        }
        Ok(Self {
            child: Box::new(child),
            sub_start,
            sub_end,
            target,
            enabled: false,
            in_progress: false,
        })
    }

    pub fn enabled(mut self) -> Self {
        self.enabled = true;
        self
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn child(&self) -> &Timeline {
        &self.child
    }

    /// Child frame for parent progress `t`.
    pub fn child_frame(&self, t: f64) -> f64 {
        lerp_f64(self.sub_start, self.sub_end, t)
    }
}

impl std::fmt::Debug for NestedTimelineEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NestedTimelineEvent")
            .field("sub_start", &self.sub_start)
            .field("sub_end", &self.sub_end)
            .field("target", &self.target)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

impl Event for NestedTimelineEvent {
    fn class(&self) -> EventClass {
        EventClass::Render
    }

    fn validate(&self, pool: &RenderTargetPool) -> SeqResult<()> {
        pool.check(self.target)
    }

    fn update(
        &mut self,
        step: &EventStep,
        _ctx: &mut FrameContext,
        env: &mut EventEnv<'_>,
    ) -> SeqResult<EventOutcome> {
        if !self.enabled {
            return Ok(EventOutcome::Idle);
        }
        if self.in_progress {
            tracing::warn!("nested timeline re-entered, skipping");
            return Ok(EventOutcome::Idle);
        }

        self.in_progress = true;
        let frame = self.child_frame(step.t);
        let output = self.child.evaluate(frame);
        let wrote = match env.pool.write(self.target) {
            Some(mut view) => {
                blit_frame_into(output, &mut view);
                true
            }
            None => false,
        };
        self.in_progress = false;

        Ok(if wrote {
            EventOutcome::Wrote(self.target)
        } else {
            EventOutcome::Idle
        })
    }
}
