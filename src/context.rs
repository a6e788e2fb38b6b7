use glam::Vec3;

use crate::scene::camera::{CameraPose, SceneView};

/// Camera supplied by a camera-override event for the rest of the frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraOverride {
    pub current: CameraPose,
    /// Pose at the previous frame's progress, for velocity data.
    pub previous: CameraPose,
}

/// Mutable state shared by the events of one frame evaluation.
///
/// Reset before the first event runs. A mutation is visible to every event later in the array and
/// to none earlier in it; nothing survives into the next frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameContext {
    pub camera_override: Option<CameraOverride>,
    pub shake_eye: Vec3,
    pub shake_target: Vec3,
    /// Absolute timeline time in simulated milliseconds.
    pub time_ms: f64,
    /// Matrices of the most recent scene render this frame.
    pub last_view: Option<SceneView>,
    pub finish_requested: bool,
}

impl FrameContext {
    pub(crate) fn reset(&mut self, time_ms: f64) {
        *self = Self {
            time_ms,
            ..Self::default()
        };
    }

    pub fn add_shake(&mut self, eye: Vec3, target: Vec3) {
        self.shake_eye += eye;
        self.shake_target += target;
    }
}
