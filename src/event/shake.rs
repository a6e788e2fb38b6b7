use glam::Vec3;

use crate::{
    animation::curve::Curve,
    context::FrameContext,
    event::{Event, EventClass, EventEnv, EventOutcome, EventStep},
    foundation::error::{SeqError, SeqResult},
    foundation::math::Rng64,
};

/// Adds deterministic noise to the camera eye and target of every later scene render this frame.
///
/// Random offsets sit on a grid of `frequency` keys per second of absolute timeline time and are
/// interpolated linearly between keys. Each key is derived from `(seed, key index)` alone, so
/// evaluation order and seeking never change the result.
#[derive(Clone, Debug)]
pub struct CameraShakeEvent {
    frequency: f64,
    eye_intensity: Curve,
    target_intensity: Curve,
    seed: u64,
}

impl CameraShakeEvent {
    pub fn new(
        frequency: f64,
        eye_intensity: Curve,
        target_intensity: Curve,
        seed: u64,
    ) -> SeqResult<Self> {
        if !frequency.is_finite() || frequency <= 0.0 {
            return Err(SeqError::validation(format!(
                "shake frequency must be finite and > 0, got {frequency}"
            )));
        }
        Ok(Self {
            frequency,
            eye_intensity,
            target_intensity,
            seed,
        })
    }

    /// Unscaled `(eye, target)` offsets at absolute time `time_ms`.
    ///
    /// Keys lie inside the unit ball and the ball is convex, so neither offset is ever longer
    /// than 1 before the intensity curves scale it.
    pub fn noise_at(&self, time_ms: f64) -> (Vec3, Vec3) {
        let x = time_ms / 1000.0 * self.frequency;
        let k0 = x.floor();
        let frac = (x - k0) as f32;
        let (eye0, target0) = self.key(k0 as i64);
        let (eye1, target1) = self.key(k0 as i64 + 1);
        (eye0.lerp(eye1, frac), target0.lerp(target1, frac))
    }

    fn key(&self, index: i64) -> (Vec3, Vec3) {
        let mut rng = Rng64::keyed(self.seed, index);
        let eye = rng.next_in_unit_ball();
        let target = rng.next_in_unit_ball();
        (eye, target)
    }
}

impl Event for CameraShakeEvent {
    fn class(&self) -> EventClass {
        EventClass::State
    }

    fn update(
        &mut self,
        step: &EventStep,
        ctx: &mut FrameContext,
        _env: &mut EventEnv<'_>,
    ) -> SeqResult<EventOutcome> {
        let (eye, target) = self.noise_at(ctx.time_ms);
        let eye_scale = self.eye_intensity.sample(step.t) as f32;
        let target_scale = self.target_intensity.sample(step.t) as f32;
        ctx.add_shake(eye * eye_scale, target * target_scale);
        Ok(EventOutcome::Idle)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/event/shake.rs"]
mod tests;
