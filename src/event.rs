//! Scheduled units of work.
//!
//! The scheduler only knows the [`Event`] trait. Built-in kinds live in the submodules; custom
//! kinds implement the trait and are added through
//! [`TimelineBuilder::event`](crate::TimelineBuilder::event).

pub(crate) mod camera_override;
pub(crate) mod effect;
pub(crate) mod nested;
pub(crate) mod particles;
pub(crate) mod scene_render;
pub(crate) mod shake;
pub(crate) mod terminate;

use crate::{
    animation::remap::TimeRemapper,
    context::FrameContext,
    foundation::core::{Fps, FrameRange},
    foundation::error::SeqResult,
    material::MaterialSystem,
    render::pool::RenderTargetPool,
    render::target::TargetId,
    scene::SceneRegistry,
};

/// Behavioral class of an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventClass {
    /// Produces pixels in a render target.
    Render,
    /// Mutates the [`FrameContext`] only.
    State,
    /// Mutates external simulation state only.
    Update,
}

/// Timing of one event for the frame being evaluated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EventStep {
    /// Absolute timeline frame.
    pub frame: f64,
    /// Local progress, remapped when the event carries a [`TimeRemapper`].
    pub t: f64,
    /// Local progress of `frame - 1`, remapped the same way. Negative on the first frame of a
    /// linear event.
    pub prev_t: f64,
    pub aspect: f64,
    pub range: FrameRange,
    pub fps: Fps,
}

/// What an update did to the render target pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventOutcome {
    Idle,
    Wrote(TargetId),
}

/// Collaborators handed to events during evaluation.
pub struct EventEnv<'a> {
    pub pool: &'a mut RenderTargetPool,
    pub scenes: &'a mut SceneRegistry,
    pub materials: &'a mut dyn MaterialSystem,
}

/// A time-bounded unit of work.
///
/// The scheduler owns timing: it decides activation from the event's half-open range, computes
/// progress, and calls [`Event::on_activate`] on the first active frame after an inactive one.
pub trait Event {
    fn class(&self) -> EventClass;

    /// Construction-time check of pool references.
    fn validate(&self, _pool: &RenderTargetPool) -> SeqResult<()> {
        Ok(())
    }

    /// Called before `update` on an activation edge.
    fn on_activate(&mut self, _step: &EventStep) {}

    fn update(
        &mut self,
        step: &EventStep,
        ctx: &mut FrameContext,
        env: &mut EventEnv<'_>,
    ) -> SeqResult<EventOutcome>;
}

/// An event plus the scheduling data the timeline keeps for it.
pub struct EventSpec {
    pub name: String,
    pub range: FrameRange,
    pub remap: Option<TimeRemapper>,
    pub event: Box<dyn Event>,
}

impl EventSpec {
    pub fn new(name: impl Into<String>, range: FrameRange, event: impl Event + 'static) -> Self {
        Self {
            name: name.into(),
            range,
            remap: None,
            event: Box::new(event),
        }
    }

    pub fn boxed(name: impl Into<String>, range: FrameRange, event: Box<dyn Event>) -> Self {
        Self {
            name: name.into(),
            range,
            remap: None,
            event,
        }
    }

    pub fn remap(mut self, remap: TimeRemapper) -> Self {
        self.remap = Some(remap);
        self
    }
}

impl std::fmt::Debug for EventSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSpec")
            .field("name", &self.name)
            .field("range", &self.range)
            .field("remap", &self.remap.is_some())
            .field("class", &self.event.class())
            .finish()
    }
}
