use crate::{
    animation::ease::Ease,
    foundation::error::{SeqError, SeqResult},
    foundation::math::lerp_f64,
};

/// One key of a [`Curve`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CurveKey {
    /// Position on the curve's input axis (event progress for event-owned curves).
    pub at: f64,
    pub value: f64,
    #[serde(default)]
    pub ease: Ease, // ease applied toward next key
}

impl CurveKey {
    pub fn new(at: f64, value: f64) -> Self {
        Self {
            at,
            value,
            ease: Ease::Linear,
        }
    }

    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }
}

/// Keyframed scalar sampled by normalized progress.
///
/// Inputs before the first key hold the first value, inputs after the last key hold the last value.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Vec<CurveKey>", into = "Vec<CurveKey>")]
pub struct Curve {
    keys: Vec<CurveKey>, // sorted by `at`
}

impl TryFrom<Vec<CurveKey>> for Curve {
    type Error = SeqError;

    fn try_from(keys: Vec<CurveKey>) -> SeqResult<Self> {
        Self::new(keys)
    }
}

impl From<Curve> for Vec<CurveKey> {
    fn from(curve: Curve) -> Self {
        curve.keys
    }
}

impl Curve {
    pub fn new(keys: Vec<CurveKey>) -> SeqResult<Self> {
        if keys.is_empty() {
            return Err(SeqError::validation("Curve must have at least one key"));
        }
        if keys.iter().any(|k| !k.at.is_finite() || !k.value.is_finite()) {
            return Err(SeqError::validation("Curve keys must be finite"));
        }
        if !keys.windows(2).all(|w| w[0].at <= w[1].at) {
            return Err(SeqError::validation("Curve keys must be sorted by input"));
        }
        Ok(Self { keys })
    }

    pub fn constant(value: f64) -> Self {
        Self {
            keys: vec![CurveKey::new(0.0, value)],
        }
    }

    /// Linear ramp from `(0, from)` to `(1, to)`.
    pub fn ramp(from: f64, to: f64) -> Self {
        Self::eased_ramp(from, to, Ease::Linear)
    }

    pub fn eased_ramp(from: f64, to: f64, ease: Ease) -> Self {
        Self {
            keys: vec![
                CurveKey::new(0.0, from).with_ease(ease),
                CurveKey::new(1.0, to),
            ],
        }
    }

    pub fn keys(&self) -> &[CurveKey] {
        &self.keys
    }

    pub fn sample(&self, x: f64) -> f64 {
        let idx = self.keys.partition_point(|k| k.at <= x);

        if idx == 0 {
            return self.keys[0].value;
        }
        if idx >= self.keys.len() {
            return self.keys[self.keys.len() - 1].value;
        }

        let a = &self.keys[idx - 1];
        let b = &self.keys[idx];
        let span = b.at - a.at;
        if span <= 0.0 {
            return b.value;
        }

        let u = (x - a.at) / span;
        lerp_f64(a.value, b.value, a.ease.apply(u))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/curve.rs"]
mod tests;
