use std::f64::consts::TAU;

use crate::{
    animation::curve::{Curve, CurveKey},
    animation::ease::Ease,
    foundation::error::{SeqError, SeqResult},
    foundation::math::{Rng64, lerp_f64},
};

/// Periodic shape of a [`Waveform`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaveShape {
    #[default]
    Sine,
    Square,
    Triangle,
    Sawtooth,
    /// Seeded value noise, one random key per cycle.
    Noise,
}

/// Oscillation layered over a remap curve.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Waveform {
    #[serde(default)]
    pub shape: WaveShape,
    pub amplitude: f64,
    /// Cycles across the event's span.
    pub frequency: f64,
    #[serde(default)]
    pub seed: u64,
    /// Scale the curve by `1 + wave` instead of adding `wave` to it.
    #[serde(default)]
    pub multiplicative: bool,
}

impl Waveform {
    pub fn new(shape: WaveShape, amplitude: f64, frequency: f64) -> Self {
        Self {
            shape,
            amplitude,
            frequency,
            seed: 0,
            multiplicative: false,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn multiplicative(mut self) -> Self {
        self.multiplicative = true;
        self
    }

    pub fn validate(&self) -> SeqResult<()> {
        if !self.amplitude.is_finite() {
            return Err(SeqError::validation("waveform amplitude must be finite"));
        }
        if !self.frequency.is_finite() || self.frequency < 0.0 {
            return Err(SeqError::validation(format!(
                "waveform frequency must be finite and >= 0, got {}",
                self.frequency
            )));
        }
        Ok(())
    }

    /// Wave value at progress `t`, scaled by the amplitude.
    pub fn value(&self, t: f64) -> f64 {
        let x = t * self.frequency;
        let unit = match self.shape {
            WaveShape::Sine => (x * TAU).sin(),
            WaveShape::Square => {
                if x.rem_euclid(1.0) < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            WaveShape::Triangle => 1.0 - 4.0 * ((x + 0.25).rem_euclid(1.0) - 0.5).abs(),
            WaveShape::Sawtooth => 2.0 * x.rem_euclid(1.0) - 1.0,
            WaveShape::Noise => {
                let k0 = x.floor();
                let a = Rng64::keyed(self.seed, k0 as i64).next_signed();
                let b = Rng64::keyed(self.seed, k0 as i64 + 1).next_signed();
                lerp_f64(a, b, x - k0)
            }
        };
        unit * self.amplitude
    }

    fn modulate(&self, base: f64, t: f64) -> f64 {
        let wave = self.value(t);
        if self.multiplicative {
            base * (1.0 + wave)
        } else {
            base + wave
        }
    }
}

/// Non-linear remapping of event progress.
///
/// Keys are `(input, output)` pairs with both coordinates in `[0, 1]`, sorted by input. Outside the
/// keyed span the nearest key's output is held, so evaluation at `0` and `1` is always defined.
/// A looped remapper repeats the keyed span instead of holding. An optional [`Waveform`] is
/// layered on top; the modulated result is clamped back to `[0, 1]`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RemapDef", into = "RemapDef")]
pub struct TimeRemapper {
    curve: Curve,
    looped: bool,
    waveform: Option<Waveform>,
}

/// Serialized forms: a bare key list, or keys with loop and waveform settings.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
enum RemapDef {
    Keys(Vec<CurveKey>),
    Spline {
        keys: Vec<CurveKey>,
        #[serde(default, rename = "loop")]
        looped: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        waveform: Option<Waveform>,
    },
}

impl TryFrom<RemapDef> for TimeRemapper {
    type Error = SeqError;

    fn try_from(def: RemapDef) -> SeqResult<Self> {
        match def {
            RemapDef::Keys(keys) => Self::from_keys(keys),
            RemapDef::Spline {
                keys,
                looped,
                waveform,
            } => {
                let mut remap = Self::from_keys(keys)?;
                remap.looped = looped;
                match waveform {
                    Some(w) => remap.with_waveform(w),
                    None => Ok(remap),
                }
            }
        }
    }
}

impl From<TimeRemapper> for RemapDef {
    fn from(remap: TimeRemapper) -> Self {
        let keys = remap.curve.into();
        if !remap.looped && remap.waveform.is_none() {
            return Self::Keys(keys);
        }
        Self::Spline {
            keys,
            looped: remap.looped,
            waveform: remap.waveform,
        }
    }
}

impl TimeRemapper {
    /// Remapper through linear `(input, output)` pairs.
    pub fn new(pairs: &[(f64, f64)]) -> SeqResult<Self> {
        Self::from_keys(
            pairs
                .iter()
                .map(|&(input, output)| CurveKey::new(input, output))
                .collect(),
        )
    }

    pub fn from_keys(keys: Vec<CurveKey>) -> SeqResult<Self> {
        for k in &keys {
            if !(0.0..=1.0).contains(&k.at) || !(0.0..=1.0).contains(&k.value) {
                return Err(SeqError::validation(format!(
                    "TimeRemapper keys must lie in [0,1] (got ({}, {}))",
                    k.at, k.value
                )));
            }
        }
        Ok(Self::from_curve(Curve::new(keys)?))
    }

    fn from_curve(curve: Curve) -> Self {
        Self {
            curve,
            looped: false,
            waveform: None,
        }
    }

    pub fn identity() -> Self {
        Self::from_curve(Curve::ramp(0.0, 1.0))
    }

    /// Single-segment remap `0 -> 0`, `1 -> 1` shaped by `ease`.
    pub fn eased(ease: Ease) -> Self {
        Self::from_curve(Curve::eased_ramp(0.0, 1.0, ease))
    }

    /// Repeat the keyed span instead of holding its end values.
    pub fn looped(mut self) -> Self {
        self.looped = true;
        self
    }

    pub fn with_waveform(mut self, waveform: Waveform) -> SeqResult<Self> {
        waveform.validate()?;
        self.waveform = Some(waveform);
        Ok(self)
    }

    pub fn keys(&self) -> &[CurveKey] {
        self.curve.keys()
    }

    pub fn is_looped(&self) -> bool {
        self.looped
    }

    pub fn waveform(&self) -> Option<&Waveform> {
        self.waveform.as_ref()
    }

    pub fn remap(&self, t: f64) -> f64 {
        let x = if self.looped { self.wrap(t) } else { t };
        let base = self.curve.sample(x);
        match &self.waveform {
            Some(w) => w.modulate(base, t).clamp(0.0, 1.0),
            None => base,
        }
    }

    fn wrap(&self, t: f64) -> f64 {
        let keys = self.curve.keys();
        let first = keys[0].at;
        let span = keys[keys.len() - 1].at - first;
        if span <= 0.0 {
            return t;
        }
        first + (t - first).rem_euclid(span)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/remap.rs"]
mod tests;
