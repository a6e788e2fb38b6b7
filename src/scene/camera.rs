use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

/// Evaluated camera state, as read from a scene graph at one moment.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CameraPose {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Rotation around the viewing axis, radians.
    pub roll: f32,
    /// Vertical field of view, radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    /// Projection center shift in normalized device coordinates.
    pub center_shift: Vec2,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            roll: 0.0,
            fov_y: 45.0_f32.to_radians(),
            near: 0.1,
            far: 1000.0,
            center_shift: Vec2::ZERO,
        }
    }
}

impl CameraPose {
    /// Same pose with eye and look target displaced.
    pub fn shaken(self, eye_offset: Vec3, target_offset: Vec3) -> Self {
        Self {
            eye: self.eye + eye_offset,
            target: self.target + target_offset,
            ..self
        }
    }

    /// Right-handed look-at view with `roll` applied around the viewing axis.
    pub fn view_matrix(&self) -> Mat4 {
        let up = match (self.target - self.eye).try_normalize() {
            Some(forward) if self.roll != 0.0 => {
                Quat::from_axis_angle(forward, self.roll) * self.up
            }
            _ => self.up,
        };
        Mat4::look_at_rh(self.eye, self.target, up)
    }

    /// Perspective projection shifted off-center by `center_shift` (in NDC units).
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        let proj = Mat4::perspective_rh(self.fov_y, aspect, self.near, self.far);
        let shift = Mat4::from_cols(
            Vec4::X,
            Vec4::Y,
            Vec4::Z,
            Vec4::new(self.center_shift.x, self.center_shift.y, 0.0, 1.0),
        );
        shift * proj
    }

    pub fn matrices(&self, aspect: f32) -> ViewMatrices {
        ViewMatrices {
            view: self.view_matrix(),
            projection: self.projection_matrix(aspect),
        }
    }
}

/// View and projection for one moment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewMatrices {
    pub view: Mat4,
    pub projection: Mat4,
}

impl Default for ViewMatrices {
    fn default() -> Self {
        Self {
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
        }
    }
}

impl ViewMatrices {
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

/// Everything a scene draw needs from the camera: current and previous-frame matrices (for
/// velocity buffers), the final eye position, and the aspect ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneView {
    pub current: ViewMatrices,
    pub previous: ViewMatrices,
    pub eye: Vec3,
    pub target: Vec3,
    pub aspect: f32,
}

#[cfg(test)]
#[path = "../../tests/unit/scene/camera.rs"]
mod tests;
