//! Material/shader collaborator used by full-screen effect passes.

use std::collections::HashMap;

use glam::{Mat4, Vec2};
use smallvec::SmallVec;

use crate::{
    animation::curve::Curve,
    foundation::error::{SeqError, SeqResult},
    render::fullscreen::BlendMode,
    render::target::{ReadView, TargetId, Texel},
};

/// One pass of a full-screen effect.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PassDescriptor {
    /// Shader name resolved by the [`MaterialSystem`].
    pub shader: String,
    /// Texture slots. A slot naming the pass's own target is read through the scratch copy.
    #[serde(default)]
    pub inputs: Vec<Option<TargetId>>,
    /// Output target; defaults to the owning event's target.
    #[serde(default)]
    pub target: Option<TargetId>,
    #[serde(default)]
    pub blend: BlendMode,
    /// Animated shader parameters, sampled at the event's (remapped) progress.
    #[serde(default)]
    pub params: Vec<Curve>,
}

impl PassDescriptor {
    pub fn new(shader: impl Into<String>) -> Self {
        Self {
            shader: shader.into(),
            inputs: Vec::new(),
            target: None,
            blend: BlendMode::Replace,
            params: Vec::new(),
        }
    }

    pub fn input(mut self, slot: usize, target: TargetId) -> Self {
        if self.inputs.len() <= slot {
            self.inputs.resize(slot + 1, None);
        }
        self.inputs[slot] = Some(target);
        self
    }

    pub fn target(mut self, target: TargetId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn blend(mut self, blend: BlendMode) -> Self {
        self.blend = blend;
        self
    }

    pub fn param(mut self, curve: Curve) -> Self {
        self.params.push(curve);
        self
    }
}

/// Per-pass constant data.
#[derive(Clone, Debug, PartialEq)]
pub struct PassUniforms {
    pub time: f32,
    pub prev_time: f32,
    pub aspect: f32,
    pub resolution: Vec2,
    pub view: Mat4,
    pub projection: Mat4,
    pub prev_view: Mat4,
    pub prev_projection: Mat4,
    pub params: SmallVec<[f32; 8]>,
}

impl Default for PassUniforms {
    fn default() -> Self {
        Self {
            time: 0.0,
            prev_time: 0.0,
            aspect: 1.0,
            resolution: Vec2::ONE,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            prev_view: Mat4::IDENTITY,
            prev_projection: Mat4::IDENTITY,
            params: SmallVec::new(),
        }
    }
}

/// Pixel being shaded by a full-screen draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fragment {
    pub x: u32,
    pub y: u32,
    /// Texel-center coordinates in `[0, 1]`.
    pub uv: Vec2,
}

/// Read views bound to a pass's texture slots.
#[derive(Clone, Debug, Default)]
pub struct PassInputs<'a> {
    slots: SmallVec<[Option<ReadView<'a>>; 4]>,
}

impl<'a> PassInputs<'a> {
    pub fn new(slots: impl IntoIterator<Item = Option<ReadView<'a>>>) -> Self {
        Self {
            slots: slots.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, slot: usize) -> Option<ReadView<'a>> {
        self.slots.get(slot).copied().flatten()
    }

    /// Bilinear sample of `slot`; unbound slots read transparent black.
    pub fn sample(&self, slot: usize, uv: Vec2) -> Texel {
        self.get(slot)
            .map(|v| v.sample(uv.x, uv.y))
            .unwrap_or([0.0; 4])
    }

    /// Texel fetch from `slot`; unbound slots read transparent black.
    pub fn fetch(&self, slot: usize, x: i64, y: i64) -> Texel {
        self.get(slot).map(|v| v.fetch(x, y)).unwrap_or([0.0; 4])
    }
}

/// External material/shader system.
///
/// `shade` runs for every pixel of a full-screen draw, possibly from several threads.
pub trait MaterialSystem: Send + Sync {
    fn bind_pass(&mut self, pass: &PassDescriptor) -> SeqResult<()>;

    fn upload_uniforms(&mut self, uniforms: &PassUniforms) -> SeqResult<()>;

    fn shade(&self, frag: Fragment, inputs: &PassInputs<'_>) -> Texel;
}

/// Shader body for [`ShaderTable`].
pub type ShaderFn = dyn Fn(Fragment, &PassInputs<'_>, &PassUniforms) -> Texel + Send + Sync;

/// Material system backed by named Rust closures.
#[derive(Default)]
pub struct ShaderTable {
    shaders: HashMap<String, Box<ShaderFn>>,
    bound: Option<String>,
    uniforms: PassUniforms,
}

impl ShaderTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        name: impl Into<String>,
        shader: impl Fn(Fragment, &PassInputs<'_>, &PassUniforms) -> Texel + Send + Sync + 'static,
    ) -> &mut Self {
        self.shaders.insert(name.into(), Box::new(shader));
        self
    }

    pub fn with(
        mut self,
        name: impl Into<String>,
        shader: impl Fn(Fragment, &PassInputs<'_>, &PassUniforms) -> Texel + Send + Sync + 'static,
    ) -> Self {
        self.register(name, shader);
        self
    }

    pub fn uniforms(&self) -> &PassUniforms {
        &self.uniforms
    }
}

impl std::fmt::Debug for ShaderTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.shaders.keys().collect();
        names.sort();
        f.debug_struct("ShaderTable")
            .field("shaders", &names)
            .field("bound", &self.bound)
            .finish()
    }
}

impl MaterialSystem for ShaderTable {
    fn bind_pass(&mut self, pass: &PassDescriptor) -> SeqResult<()> {
        if !self.shaders.contains_key(&pass.shader) {
            return Err(SeqError::render(format!(
                "unknown shader '{}'",
                pass.shader
            )));
        }
        self.bound = Some(pass.shader.clone());
        Ok(())
    }

    fn upload_uniforms(&mut self, uniforms: &PassUniforms) -> SeqResult<()> {
        self.uniforms = uniforms.clone();
        Ok(())
    }

    fn shade(&self, frag: Fragment, inputs: &PassInputs<'_>) -> Texel {
        match self.bound.as_ref().and_then(|name| self.shaders.get(name)) {
            Some(shader) => shader(frag, inputs, &self.uniforms),
            None => [0.0; 4],
        }
    }
}
