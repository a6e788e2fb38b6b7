use crate::{
    context::FrameContext,
    event::{Event, EventClass, EventEnv, EventOutcome, EventStep},
    foundation::error::SeqResult,
};

/// Marks the sequence as finished. The timeline latches the flag after the frame completes.
#[derive(Clone, Copy, Debug, Default)]
pub struct TerminateEvent;

impl Event for TerminateEvent {
    fn class(&self) -> EventClass {
        EventClass::State
    }

    fn update(
        &mut self,
        _step: &EventStep,
        ctx: &mut FrameContext,
        _env: &mut EventEnv<'_>,
    ) -> SeqResult<EventOutcome> {
        ctx.finish_requested = true;
        Ok(EventOutcome::Idle)
    }
}
