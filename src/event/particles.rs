use crate::{
    context::FrameContext,
    event::{Event, EventClass, EventEnv, EventOutcome, EventStep},
    foundation::error::SeqResult,
    scene::{ClipId, ObjectId, SceneId},
};

/// Advances particle simulations by the simulated time elapsed since the previous active frame.
///
/// The clock follows the event's (possibly remapped) progress, so a remapper that slows the event
/// down slows the simulation with it.
#[derive(Clone, Debug)]
pub struct ParticleUpdateEvent {
    scene: SceneId,
    clip: ClipId,
    object: Option<ObjectId>,
    last_clock_ms: f64,
    last_delta: f64,
}

impl ParticleUpdateEvent {
    pub fn new(scene: SceneId) -> Self {
        Self {
            scene,
            clip: ClipId::default(),
            object: None,
            last_clock_ms: 0.0,
            last_delta: 0.0,
        }
    }

    pub fn with_clip(mut self, clip: ClipId) -> Self {
        self.clip = clip;
        self
    }

    /// Restricts the update to a single simulation object.
    pub fn only(mut self, object: ObjectId) -> Self {
        self.object = Some(object);
        self
    }

    /// Seconds passed to the simulations by the most recent update.
    pub fn last_delta(&self) -> f64 {
        self.last_delta
    }

    fn clock_ms(step: &EventStep) -> f64 {
        step.fps.frames_to_ms(step.range.frame_at(step.t))
    }
}

impl Event for ParticleUpdateEvent {
    fn class(&self) -> EventClass {
        EventClass::Update
    }

    fn on_activate(&mut self, step: &EventStep) {
        self.last_clock_ms = Self::clock_ms(step);
    }

    fn update(
        &mut self,
        step: &EventStep,
        _ctx: &mut FrameContext,
        env: &mut EventEnv<'_>,
    ) -> SeqResult<EventOutcome> {
        let clock = Self::clock_ms(step);
        let delta = (clock - self.last_clock_ms) / 1000.0;
        self.last_clock_ms = clock;
        self.last_delta = delta;

        let Some(scene) = env.scenes.get_mut(self.scene) else {
            tracing::debug!(scene = self.scene.0, "scene missing, skipping particle update");
            return Ok(EventOutcome::Idle);
        };
        scene.update(self.clip, step.t);

        let mut advanced = 0usize;
        scene.for_each_simulation(self.object, &mut |_, sim| {
            sim.advance(delta);
            advanced += 1;
        });
        tracing::trace!(delta, advanced, "advanced simulations");
        Ok(EventOutcome::Idle)
    }
}
