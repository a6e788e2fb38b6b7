//! Scene-graph collaborators consumed by scene, particle and camera events.
//!
//! The timeline never looks inside a scene. It asks a [`SceneGraph`] to evaluate a clip at a time,
//! to report a camera, to re-sort its blended elements and to draw into a target.

pub(crate) mod camera;

use glam::Vec3;

use crate::{
    foundation::error::SeqResult,
    render::target::{DepthBuffer, WriteView},
    scene::camera::{CameraPose, SceneView},
};

/// Index of a scene inside a [`SceneRegistry`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct SceneId(pub u32);

/// Object (camera, emitter, mesh) inside a scene.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ObjectId(pub u32);

/// Animation clip inside a scene.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct ClipId(pub u32);

/// A camera object and the clip that animates it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct CameraRef {
    pub scene: SceneId,
    #[serde(default)]
    pub clip: ClipId,
    pub camera: ObjectId,
}

/// Updates `scene` at `prev_t`, then at `t`, reading the camera after each. Returns
/// `(current, previous)`.
///
/// The scene is left evaluated at `t`. A camera missing at `prev_t` but present at `t` reuses the
/// current pose as the previous one.
pub(crate) fn evaluate_camera(
    scene: &mut dyn SceneGraph,
    clip: ClipId,
    camera: ObjectId,
    t: f64,
    prev_t: f64,
) -> Option<(CameraPose, CameraPose)> {
    scene.update(clip, prev_t);
    let previous = scene.camera(camera);
    scene.update(clip, t);
    let current = scene.camera(camera)?;
    Some((current, previous.unwrap_or(current)))
}

/// Stateful simulation object, e.g. a particle emitter.
pub trait Simulation {
    fn advance(&mut self, delta_seconds: f64);
}

/// External scene graph.
pub trait SceneGraph {
    /// Evaluates transforms and animation of `clip` at normalized `time`.
    fn update(&mut self, clip: ClipId, time: f64);

    /// Current pose of a camera object, `None` if the object is absent or not a camera.
    fn camera(&self, object: ObjectId) -> Option<CameraPose>;

    /// Re-sorts back-to-front dependent elements for the given eye position.
    fn sort_back_to_front(&mut self, _eye: Vec3) {}

    /// Draws the scene into `target`. Clears have already been applied by the caller.
    fn draw(
        &mut self,
        view: &SceneView,
        target: WriteView<'_>,
        depth: &mut DepthBuffer,
    ) -> SeqResult<()>;

    /// Visits simulation objects, all of them or only `filter`.
    fn for_each_simulation(
        &mut self,
        _filter: Option<ObjectId>,
        _visit: &mut dyn FnMut(ObjectId, &mut dyn Simulation),
    ) {
    }
}

/// Scenes addressable by events through [`SceneId`].
#[derive(Default)]
pub struct SceneRegistry {
    scenes: Vec<Box<dyn SceneGraph>>,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, scene: Box<dyn SceneGraph>) -> SceneId {
        let id = SceneId(self.scenes.len() as u32);
        self.scenes.push(scene);
        id
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn get(&self, id: SceneId) -> Option<&dyn SceneGraph> {
        self.scenes.get(id.0 as usize).map(|s| s.as_ref())
    }

    pub fn get_mut(&mut self, id: SceneId) -> Option<&mut (dyn SceneGraph + 'static)> {
        self.scenes.get_mut(id.0 as usize).map(|s| s.as_mut())
    }
}

impl std::fmt::Debug for SceneRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneRegistry")
            .field("scenes", &self.scenes.len())
            .finish()
    }
}
