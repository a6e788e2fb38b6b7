use crate::{
    context::{CameraOverride, FrameContext},
    event::{Event, EventClass, EventEnv, EventOutcome, EventStep},
    foundation::error::SeqResult,
    scene::{CameraRef, evaluate_camera},
};

/// Replaces the camera of every later scene render this frame.
///
/// Only the referenced scene's clip is evaluated; the scene is not drawn.
#[derive(Clone, Copy, Debug)]
pub struct CameraOverrideEvent {
    camera: CameraRef,
}

impl CameraOverrideEvent {
    pub fn new(camera: CameraRef) -> Self {
        Self { camera }
    }
}

impl Event for CameraOverrideEvent {
    fn class(&self) -> EventClass {
        EventClass::State
    }

    fn update(
        &mut self,
        step: &EventStep,
        ctx: &mut FrameContext,
        env: &mut EventEnv<'_>,
    ) -> SeqResult<EventOutcome> {
        let Some(scene) = env.scenes.get_mut(self.camera.scene) else {
            tracing::debug!(scene = self.camera.scene.0, "scene missing, override skipped");
            return Ok(EventOutcome::Idle);
        };
        match evaluate_camera(scene, self.camera.clip, self.camera.camera, step.t, step.prev_t) {
            Some((current, previous)) => {
                ctx.camera_override = Some(CameraOverride { current, previous });
            }
            None => {
                tracing::debug!(camera = self.camera.camera.0, "camera missing, override skipped");
            }
        }
        Ok(EventOutcome::Idle)
    }
}
