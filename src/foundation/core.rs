use crate::foundation::error::{SeqError, SeqResult};

pub use glam::{Mat4, Vec2, Vec3};

/// Integer frame number on the timeline.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Half-open frame interval `[start, end)`.
///
/// Unlike a clip range, an event range can never be empty: `start < end` is enforced on
/// construction so local progress never divides by zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawFrameRange")]
pub struct FrameRange {
    pub start: FrameIndex,
    pub end: FrameIndex, // exclusive
}

#[derive(serde::Deserialize)]
struct RawFrameRange {
    start: FrameIndex,
    end: FrameIndex,
}

impl TryFrom<RawFrameRange> for FrameRange {
    type Error = SeqError;

    fn try_from(raw: RawFrameRange) -> SeqResult<Self> {
        Self::new(raw.start, raw.end)
    }
}

impl FrameRange {
    pub fn new(start: FrameIndex, end: FrameIndex) -> SeqResult<Self> {
        if start.0 >= end.0 {
            return Err(SeqError::validation(format!(
                "FrameRange start must be < end (got {}..{})",
                start.0, end.0
            )));
        }
        Ok(Self { start, end })
    }

    /// Shorthand for `FrameRange::new(FrameIndex(start), FrameIndex(end))`.
    pub fn frames(start: u64, end: u64) -> SeqResult<Self> {
        Self::new(FrameIndex(start), FrameIndex(end))
    }

    pub fn len_frames(self) -> u64 {
        self.end.0 - self.start.0
    }

    pub fn contains(self, frame: f64) -> bool {
        self.start.0 as f64 <= frame && frame < self.end.0 as f64
    }

    /// Linear progress of `frame` through the range. Not clamped.
    pub fn progress(self, frame: f64) -> f64 {
        (frame - self.start.0 as f64) / self.len_frames() as f64
    }

    /// Inverse of [`FrameRange::progress`].
    pub fn frame_at(self, t: f64) -> f64 {
        self.start.0 as f64 + t * self.len_frames() as f64
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Fps {
    pub fn new(num: u32, den: u32) -> SeqResult<Self> {
        if den == 0 {
            return Err(SeqError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(SeqError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    pub fn frames_to_secs(self, frames: f64) -> f64 {
        frames * f64::from(self.den) / f64::from(self.num)
    }

    pub fn frames_to_ms(self, frames: f64) -> f64 {
        self.frames_to_secs(frames) * 1000.0
    }

    pub fn secs_to_frames(self, secs: f64) -> f64 {
        secs * self.as_f64()
    }
}

/// Output surface resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn validate(self) -> SeqResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SeqError::validation("Canvas width/height must be > 0"));
        }
        Ok(())
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Default for Rgba8Premul {
    fn default() -> Self {
        Self::opaque_black()
    }
}

impl Rgba8Premul {
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    pub fn opaque_black() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 255,
        }
    }

    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
