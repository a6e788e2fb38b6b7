//! Frame scheduler.
//!
//! A [`Timeline`] owns an ordered event list and the collaborators those events draw with. Each
//! call to [`Timeline::evaluate`] is self-contained: the frame context and every render target
//! start from a cleared state, events run in array order, and the most recently written target is
//! letterboxed onto the output frame.

use crate::{
    animation::remap::TimeRemapper,
    context::FrameContext,
    event::{Event, EventEnv, EventOutcome, EventSpec, EventStep},
    foundation::core::{Canvas, Fps, FrameRange, Rgba8Premul},
    foundation::error::{SeqError, SeqResult},
    material::{MaterialSystem, ShaderTable},
    render::composite::{FrameRGBA, composite_letterboxed},
    render::pool::RenderTargetPool,
    render::target::{TargetDesc, TargetId},
    scene::{SceneGraph, SceneId, SceneRegistry},
};

/// Counters for the most recent evaluation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameStats {
    pub frame: f64,
    pub active_events: u32,
    pub failed_events: u32,
    pub aliasing_resolutions: u32,
    pub last_written: Option<TargetId>,
}

struct ScheduledEvent {
    name: String,
    range: FrameRange,
    remap: Option<TimeRemapper>,
    was_active: bool,
    body: Box<dyn Event>,
}

impl ScheduledEvent {
    fn step(&self, frame: f64, aspect: f64, fps: Fps) -> EventStep {
        let mut t = self.range.progress(frame);
        let mut prev_t = self.range.progress(frame - 1.0);
        if let Some(remap) = &self.remap {
            t = remap.remap(t);
            prev_t = remap.remap(prev_t);
        }
        EventStep {
            frame,
            t,
            prev_t,
            aspect,
            range: self.range,
            fps,
        }
    }
}

pub struct Timeline {
    fps: Fps,
    aspect: f64,
    clear: Rgba8Premul,
    events: Vec<ScheduledEvent>,
    pool: RenderTargetPool,
    scenes: SceneRegistry,
    materials: Box<dyn MaterialSystem>,
    ctx: FrameContext,
    output: FrameRGBA,
    finished: bool,
    stats: FrameStats,
}

impl Timeline {
    pub fn builder(fps: Fps, canvas: Canvas) -> TimelineBuilder {
        TimelineBuilder::new(fps, canvas)
    }

    /// Renders `frame` and returns the composited output.
    ///
    /// Event failures are logged and counted in [`Timeline::last_stats`]; they never abort the
    /// frame.
    #[tracing::instrument(skip(self), fields(events = self.events.len()))]
    pub fn evaluate(&mut self, frame: f64) -> &FrameRGBA {
        self.ctx.reset(self.fps.frames_to_ms(frame));
        self.pool.begin_frame();
        self.output.clear(self.clear);

        let mut stats = FrameStats {
            frame,
            ..FrameStats::default()
        };
        let mut env = EventEnv {
            pool: &mut self.pool,
            scenes: &mut self.scenes,
            materials: self.materials.as_mut(),
        };

        for ev in &mut self.events {
            if !ev.range.contains(frame) {
                if ev.was_active {
                    tracing::debug!(event = %ev.name, frame, "event deactivated");
                }
                ev.was_active = false;
                continue;
            }

            let step = ev.step(frame, self.aspect, self.fps);
            if !ev.was_active {
                tracing::debug!(event = %ev.name, frame, t = step.t, "event activated");
                ev.body.on_activate(&step);
            }
            stats.active_events += 1;

            tracing::trace!(event = %ev.name, t = step.t, prev_t = step.prev_t, "update");
            match ev.body.update(&step, &mut self.ctx, &mut env) {
                Ok(EventOutcome::Wrote(id)) => env.pool.mark_written(id),
                Ok(EventOutcome::Idle) => {}
                Err(err) => {
                    tracing::warn!(event = %ev.name, frame, error = %err, "event failed");
                    stats.failed_events += 1;
                }
            }
            ev.was_active = true;
        }

        if self.ctx.finish_requested && !self.finished {
            tracing::info!(frame, "sequence finished");
            self.finished = true;
        }

        stats.aliasing_resolutions = self.pool.aliasing_resolutions();
        stats.last_written = self.pool.last_written();
        if let Some(target) = stats.last_written.and_then(|id| self.pool.get(id)) {
            composite_letterboxed(target.read(), &mut self.output);
        }
        self.stats = stats;
        &self.output
    }

    /// [`Timeline::evaluate`] at a time in seconds.
    pub fn evaluate_seconds(&mut self, secs: f64) -> &FrameRGBA {
        let frame = self.fps.secs_to_frames(secs);
        self.evaluate(frame)
    }

    /// True once a terminate event has run. Stays set.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn last_stats(&self) -> FrameStats {
        self.stats
    }

    /// End of the last event, 0 for an empty timeline.
    pub fn duration_frames(&self) -> u64 {
        self.events
            .iter()
            .map(|e| e.range.end.0)
            .max()
            .unwrap_or(0)
    }

    pub fn fps(&self) -> Fps {
        self.fps
    }

    pub fn aspect(&self) -> f64 {
        self.aspect
    }

    pub fn pool(&self) -> &RenderTargetPool {
        &self.pool
    }

    pub fn context(&self) -> &FrameContext {
        &self.ctx
    }

    pub fn output(&self) -> &FrameRGBA {
        &self.output
    }

    pub fn scenes(&self) -> &SceneRegistry {
        &self.scenes
    }

    pub fn event_names(&self) -> impl Iterator<Item = &str> {
        self.events.iter().map(|e| e.name.as_str())
    }
}

impl std::fmt::Debug for Timeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timeline")
            .field("fps", &self.fps)
            .field("aspect", &self.aspect)
            .field("events", &self.events.len())
            .field("targets", &self.pool.len())
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}

/// Collects targets, scenes, materials and events, then validates them into a [`Timeline`].
pub struct TimelineBuilder {
    fps: Fps,
    canvas: Canvas,
    aspect: Option<f64>,
    clear: Rgba8Premul,
    targets: Vec<TargetDesc>,
    scenes: SceneRegistry,
    materials: Option<Box<dyn MaterialSystem>>,
    events: Vec<EventSpec>,
}

impl TimelineBuilder {
    pub fn new(fps: Fps, canvas: Canvas) -> Self {
        Self {
            fps,
            canvas,
            aspect: None,
            clear: Rgba8Premul::opaque_black(),
            targets: Vec::new(),
            scenes: SceneRegistry::new(),
            materials: None,
            events: Vec::new(),
        }
    }

    /// Aspect ratio handed to events. Defaults to the canvas aspect.
    pub fn aspect(mut self, aspect: f64) -> Self {
        self.aspect = Some(aspect);
        self
    }

    pub fn clear_color(mut self, clear: Rgba8Premul) -> Self {
        self.clear = clear;
        self
    }

    pub fn materials(mut self, materials: impl MaterialSystem + 'static) -> Self {
        self.materials = Some(Box::new(materials));
        self
    }

    pub fn boxed_materials(mut self, materials: Box<dyn MaterialSystem>) -> Self {
        self.materials = Some(materials);
        self
    }

    /// Replaces the scene registry wholesale.
    pub fn scenes(mut self, scenes: SceneRegistry) -> Self {
        self.scenes = scenes;
        self
    }

    pub fn add_target(&mut self, desc: TargetDesc) -> TargetId {
        let id = TargetId(self.targets.len() as u32);
        self.targets.push(desc);
        id
    }

    pub fn add_scene(&mut self, scene: impl SceneGraph + 'static) -> SceneId {
        self.scenes.insert(Box::new(scene))
    }

    pub fn event(mut self, spec: EventSpec) -> Self {
        self.events.push(spec);
        self
    }

    pub fn push_event(&mut self, spec: EventSpec) {
        self.events.push(spec);
    }

    #[tracing::instrument(
        skip(self),
        fields(targets = self.targets.len(), events = self.events.len())
    )]
    pub fn build(self) -> SeqResult<Timeline> {
        Fps::new(self.fps.num, self.fps.den)?;
        self.canvas.validate()?;
        let aspect = match self.aspect {
            Some(a) => a,
            None => f64::from(self.canvas.width) / f64::from(self.canvas.height),
        };
        if !aspect.is_finite() || aspect <= 0.0 {
            return Err(SeqError::validation(format!(
                "aspect must be finite and > 0, got {aspect}"
            )));
        }

        let pool = RenderTargetPool::new(&self.targets)?;
        let events = self
            .events
            .into_iter()
            .map(|spec| -> SeqResult<ScheduledEvent> {
                FrameRange::new(spec.range.start, spec.range.end)
                    .and_then(|_| spec.event.validate(&pool))
                    .map_err(|e| {
                        SeqError::validation(format!("event '{}': {e}", spec.name))
                    })?;
                Ok(ScheduledEvent {
                    name: spec.name,
                    range: spec.range,
                    remap: spec.remap,
                    was_active: false,
                    body: spec.event,
                })
            })
            .collect::<SeqResult<Vec<_>>>()?;

        tracing::debug!(events = events.len(), aspect, "timeline built");
        Ok(Timeline {
            fps: self.fps,
            aspect,
            clear: self.clear,
            events,
            pool,
            scenes: self.scenes,
            materials: self
                .materials
                .unwrap_or_else(|| Box::new(ShaderTable::new())),
            ctx: FrameContext::default(),
            output: FrameRGBA::new(self.canvas, self.clear),
            finished: false,
            stats: FrameStats::default(),
        })
    }
}

impl std::fmt::Debug for TimelineBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimelineBuilder")
            .field("fps", &self.fps)
            .field("canvas", &self.canvas)
            .field("targets", &self.targets)
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../tests/unit/timeline/timeline.rs"]
mod tests;
