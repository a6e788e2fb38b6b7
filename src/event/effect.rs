use glam::Vec2;

use crate::{
    context::FrameContext,
    event::{Event, EventClass, EventEnv, EventOutcome, EventStep},
    foundation::error::{SeqError, SeqResult},
    material::{MaterialSystem, PassDescriptor, PassInputs, PassUniforms},
    render::fullscreen::draw_fullscreen,
    render::pool::RenderTargetPool,
    render::target::TargetId,
    scene::camera::ViewMatrices,
};

/// Multi-pass full-screen post effect.
#[derive(Clone, Debug)]
pub struct FullscreenEffectEvent {
    target: TargetId,
    passes: Vec<PassDescriptor>,
}

impl FullscreenEffectEvent {
    pub fn new(target: TargetId, passes: Vec<PassDescriptor>) -> Self {
        Self { target, passes }
    }

    pub fn passes(&self) -> &[PassDescriptor] {
        &self.passes
    }

    fn uniforms(
        &self,
        pass: &PassDescriptor,
        step: &EventStep,
        ctx: &FrameContext,
        resolution: Vec2,
    ) -> PassUniforms {
        let (current, previous) = ctx
            .last_view
            .map(|v| (v.current, v.previous))
            .unwrap_or((ViewMatrices::default(), ViewMatrices::default()));
        PassUniforms {
            time: step.t as f32,
            prev_time: step.prev_t as f32,
            aspect: step.aspect as f32,
            resolution,
            view: current.view,
            projection: current.projection,
            prev_view: previous.view,
            prev_projection: previous.projection,
            params: pass.params.iter().map(|c| c.sample(step.t) as f32).collect(),
        }
    }

    fn run_pass(
        &self,
        pass: &PassDescriptor,
        step: &EventStep,
        ctx: &FrameContext,
        env: &mut EventEnv<'_>,
    ) -> SeqResult<TargetId> {
        let out = pass.target.unwrap_or(self.target);
        let Some(resolution) = env
            .pool
            .get(out)
            .map(|t| Vec2::new(t.width() as f32, t.height() as f32))
        else {
            return Err(SeqError::render(format!("pass target {} missing", out.0)));
        };

        // Bindings are resolved from the descriptor on every pass and never written back.
        let bindings = env.pool.resolve_inputs(&pass.inputs, out);
        env.materials.bind_pass(pass)?;
        env.materials
            .upload_uniforms(&self.uniforms(pass, step, ctx, resolution))?;

        let materials: &dyn MaterialSystem = &*env.materials;
        env.pool.with_target_mut(out, |target, reader| {
            let inputs = PassInputs::new(bindings.iter().map(|b| reader.view(*b)));
            draw_fullscreen(materials, &inputs, target, pass.blend);
        });
        env.pool.regenerate_mips(out);
        tracing::trace!(shader = %pass.shader, target_id = out.0, "full-screen pass");
        Ok(out)
    }
}

impl Event for FullscreenEffectEvent {
    fn class(&self) -> EventClass {
        EventClass::Render
    }

    fn validate(&self, pool: &RenderTargetPool) -> SeqResult<()> {
        if self.passes.is_empty() {
            return Err(SeqError::validation("full-screen effect has no passes"));
        }
        pool.check(self.target)?;
        for pass in &self.passes {
            if let Some(id) = pass.target {
                pool.check(id)?;
            }
            for id in pass.inputs.iter().flatten() {
                pool.check(*id)?;
            }
        }
        Ok(())
    }

    fn update(
        &mut self,
        step: &EventStep,
        ctx: &mut FrameContext,
        env: &mut EventEnv<'_>,
    ) -> SeqResult<EventOutcome> {
        let mut written = None;
        for pass in &self.passes {
            match self.run_pass(pass, step, ctx, env) {
                Ok(out) => written = Some(out),
                Err(err) => {
                    // Pixels from earlier passes are already in the pool.
                    if let Some(id) = written {
                        env.pool.mark_written(id);
                    }
                    return Err(err);
                }
            }
        }
        Ok(written.map_or(EventOutcome::Idle, EventOutcome::Wrote))
    }
}
