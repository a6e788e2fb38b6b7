//! JSON timeline descriptions.
//!
//! A [`TimelineDef`] names targets by index and scenes by their [`SceneId`] in the registry passed
//! to [`TimelineDef::build`]. Nested timelines and custom event kinds have no JSON form; add those
//! through [`TimelineBuilder::event`](crate::TimelineBuilder::event).

use crate::{
    animation::curve::Curve,
    animation::remap::TimeRemapper,
    event::EventSpec,
    event::camera_override::CameraOverrideEvent,
    event::effect::FullscreenEffectEvent,
    event::particles::ParticleUpdateEvent,
    event::scene_render::{ClearFlags, SceneRenderEvent},
    event::shake::CameraShakeEvent,
    event::terminate::TerminateEvent,
    foundation::core::{Canvas, Fps, FrameRange, Rgba8Premul},
    foundation::error::{SeqError, SeqResult},
    foundation::math::seed_from_name,
    material::{MaterialSystem, PassDescriptor},
    render::target::{TargetDesc, TargetId},
    scene::{CameraRef, ClipId, ObjectId, SceneId, SceneRegistry},
    timeline::{Timeline, TimelineBuilder},
};

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct TimelineDef {
    pub fps: Fps,
    pub canvas: Canvas,
    /// Defaults to the canvas aspect.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect: Option<f64>,
    #[serde(default = "Rgba8Premul::opaque_black")]
    pub clear: Rgba8Premul,
    #[serde(default)]
    pub targets: Vec<TargetDesc>,
    #[serde(default)]
    pub events: Vec<EventDef>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct EventDef {
    pub name: String,
    pub range: FrameRange, // [start,end)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remap: Option<TimeRemapper>,
    #[serde(flatten)]
    pub kind: EventKindDef,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventKindDef {
    SceneRender {
        camera: CameraRef,
        target: TargetId,
        #[serde(default)]
        clear: ClearFlags,
    },
    FullscreenEffect {
        target: TargetId,
        passes: Vec<PassDescriptor>,
    },
    ParticleUpdate {
        scene: SceneId,
        #[serde(default)]
        clip: ClipId,
        #[serde(default)]
        object: Option<ObjectId>,
    },
    CameraShake {
        frequency: f64,
        eye_intensity: Curve,
        #[serde(default = "zero_curve")]
        target_intensity: Curve,
        /// Defaults to a hash of the event name.
        #[serde(default)]
        seed: Option<u64>,
    },
    CameraOverride {
        camera: CameraRef,
    },
    Terminate,
}

fn zero_curve() -> Curve {
    Curve::constant(0.0)
}

impl TimelineDef {
    pub fn from_json_str(s: &str) -> SeqResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn to_json_string(&self) -> SeqResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks everything that does not need the scene registry.
    pub fn validate(&self) -> SeqResult<()> {
        if self.fps.num == 0 || self.fps.den == 0 {
            return Err(SeqError::validation("fps must have num>0 and den>0"));
        }
        self.canvas.validate()?;
        if let Some(aspect) = self.aspect
            && (!aspect.is_finite() || aspect <= 0.0)
        {
            return Err(SeqError::validation(format!(
                "aspect must be finite and > 0, got {aspect}"
            )));
        }
        for (i, desc) in self.targets.iter().enumerate() {
            desc.validate()
                .map_err(|e| SeqError::validation(format!("target {i}: {e}")))?;
        }

        let check_target = |ev: &EventDef, id: TargetId| {
            if id.index() >= self.targets.len() {
                return Err(SeqError::validation(format!(
                    "event '{}' references render target {} but only {} are declared",
                    ev.name,
                    id.0,
                    self.targets.len()
                )));
            }
            Ok(())
        };

        for ev in &self.events {
            if ev.name.trim().is_empty() {
                return Err(SeqError::validation("event name must be non-empty"));
            }
            match &ev.kind {
                EventKindDef::SceneRender { target, .. } => check_target(ev, *target)?,
                EventKindDef::FullscreenEffect { target, passes } => {
                    if passes.is_empty() {
                        return Err(SeqError::validation(format!(
                            "event '{}' has no passes",
                            ev.name
                        )));
                    }
                    check_target(ev, *target)?;
                    for pass in passes {
                        if let Some(id) = pass.target {
                            check_target(ev, id)?;
                        }
                        for id in pass.inputs.iter().flatten() {
                            check_target(ev, *id)?;
                        }
                    }
                }
                EventKindDef::CameraShake { frequency, .. } => {
                    if !frequency.is_finite() || *frequency <= 0.0 {
                        return Err(SeqError::validation(format!(
                            "event '{}' shake frequency must be finite and > 0",
                            ev.name
                        )));
                    }
                }
                EventKindDef::ParticleUpdate { .. }
                | EventKindDef::CameraOverride { .. }
                | EventKindDef::Terminate => {}
            }
        }
        Ok(())
    }

    /// Validates and turns the description into a timeline drawing `scenes` with `materials`.
    #[tracing::instrument(skip_all, fields(events = self.events.len()))]
    pub fn build(
        self,
        scenes: SceneRegistry,
        materials: Box<dyn MaterialSystem>,
    ) -> SeqResult<Timeline> {
        self.validate()?;
        let mut builder = TimelineBuilder::new(self.fps, self.canvas)
            .clear_color(self.clear)
            .scenes(scenes)
            .boxed_materials(materials);
        if let Some(aspect) = self.aspect {
            builder = builder.aspect(aspect);
        }
        for desc in self.targets {
            builder.add_target(desc);
        }
        for ev in self.events {
            builder.push_event(ev.into_spec()?);
        }
        builder.build()
    }
}

impl EventDef {
    fn into_spec(self) -> SeqResult<EventSpec> {
        let range = self.range;
        let spec = match self.kind {
            EventKindDef::SceneRender {
                camera,
                target,
                clear,
            } => EventSpec::new(
                self.name,
                range,
                SceneRenderEvent::new(camera, target).with_clear(clear),
            ),
            EventKindDef::FullscreenEffect { target, passes } => {
                EventSpec::new(self.name, range, FullscreenEffectEvent::new(target, passes))
            }
            EventKindDef::ParticleUpdate {
                scene,
                clip,
                object,
            } => {
                let mut ev = ParticleUpdateEvent::new(scene).with_clip(clip);
                if let Some(object) = object {
                    ev = ev.only(object);
                }
                EventSpec::new(self.name, range, ev)
            }
            EventKindDef::CameraShake {
                frequency,
                eye_intensity,
                target_intensity,
                seed,
            } => {
                let seed = seed.unwrap_or_else(|| seed_from_name(&self.name));
                let ev = CameraShakeEvent::new(frequency, eye_intensity, target_intensity, seed)?;
                EventSpec::new(self.name, range, ev)
            }
            EventKindDef::CameraOverride { camera } => {
                EventSpec::new(self.name, range, CameraOverrideEvent::new(camera))
            }
            EventKindDef::Terminate => EventSpec::new(self.name, range, TerminateEvent),
        };
        Ok(match self.remap {
            Some(remap) => spec.remap(remap),
            None => spec,
        })
    }
}

#[cfg(test)]
#[path = "../tests/unit/config/config.rs"]
mod tests;
