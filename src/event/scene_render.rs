use crate::{
    context::FrameContext,
    event::{Event, EventClass, EventEnv, EventOutcome, EventStep},
    foundation::error::SeqResult,
    render::pool::RenderTargetPool,
    render::target::{TargetId, Texel},
    scene::camera::SceneView,
    scene::{CameraRef, evaluate_camera},
};

/// Buffers a scene render clears before drawing.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ClearFlags {
    /// Color to clear the target to, `None` to draw over existing contents.
    pub color: Option<Texel>,
    pub depth: bool,
}

impl Default for ClearFlags {
    fn default() -> Self {
        Self {
            color: Some([0.0; 4]),
            depth: true,
        }
    }
}

impl ClearFlags {
    pub fn keep() -> Self {
        Self {
            color: None,
            depth: false,
        }
    }
}

/// Draws a scene through its own camera, or through the frame's camera override.
#[derive(Clone, Debug)]
pub struct SceneRenderEvent {
    camera: CameraRef,
    target: TargetId,
    clear: ClearFlags,
}

impl SceneRenderEvent {
    pub fn new(camera: CameraRef, target: TargetId) -> Self {
        Self {
            camera,
            target,
            clear: ClearFlags::default(),
        }
    }

    pub fn with_clear(mut self, clear: ClearFlags) -> Self {
        self.clear = clear;
        self
    }

    pub fn target(&self) -> TargetId {
        self.target
    }
}

impl Event for SceneRenderEvent {
    fn class(&self) -> EventClass {
        EventClass::Render
    }

    fn validate(&self, pool: &RenderTargetPool) -> SeqResult<()> {
        pool.check(self.target)
    }

    fn update(
        &mut self,
        step: &EventStep,
        ctx: &mut FrameContext,
        env: &mut EventEnv<'_>,
    ) -> SeqResult<EventOutcome> {
        let Some(scene) = env.scenes.get_mut(self.camera.scene) else {
            tracing::debug!(scene = self.camera.scene.0, "scene missing, skipping render");
            return Ok(EventOutcome::Idle);
        };

        let own = evaluate_camera(
            &mut *scene,
            self.camera.clip,
            self.camera.camera,
            step.t,
            step.prev_t,
        );
        let (current, previous) = match (ctx.camera_override, own) {
            (Some(o), _) => (o.current, o.previous),
            (None, Some(pair)) => pair,
            (None, None) => {
                tracing::debug!(
                    camera = self.camera.camera.0,
                    "camera missing, skipping render"
                );
                return Ok(EventOutcome::Idle);
            }
        };

        let current = current.shaken(ctx.shake_eye, ctx.shake_target);
        let aspect = step.aspect as f32;
        let view = SceneView {
            current: current.matrices(aspect),
            previous: previous.matrices(aspect),
            eye: current.eye,
            target: current.target,
            aspect,
        };

        scene.sort_back_to_front(view.eye);

        let Some((mut target, depth)) = env.pool.target_and_depth_mut(self.target) else {
            return Ok(EventOutcome::Idle);
        };
        if let Some(color) = self.clear.color {
            target.fill(color);
        }
        if self.clear.depth {
            depth.clear();
        }
        scene.draw(&view, target, depth)?;

        ctx.last_view = Some(view);
        Ok(EventOutcome::Wrote(self.target))
    }
}
