use glam::Vec2;
use rayon::prelude::*;

use crate::{
    material::{Fragment, MaterialSystem, PassInputs},
    render::target::{RenderTarget, Texel},
};

/// How a pass's shaded color combines with the target's existing contents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    #[default]
    Replace,
    /// Premultiplied source-over.
    Alpha,
    Additive,
    Multiply,
}

impl BlendMode {
    pub fn apply(self, dst: Texel, src: Texel) -> Texel {
        match self {
            Self::Replace => src,
            Self::Alpha => {
                let inv = 1.0 - src[3];
                std::array::from_fn(|i| src[i] + dst[i] * inv)
            }
            Self::Additive => std::array::from_fn(|i| dst[i] + src[i]),
            Self::Multiply => std::array::from_fn(|i| dst[i] * src[i]),
        }
    }
}

/// Shades every pixel of `target`'s base level with the bound material.
///
/// Rows are shaded in parallel; each pixel reads only `inputs`, never `target`, so row order is not
/// observable.
pub(crate) fn draw_fullscreen(
    material: &dyn MaterialSystem,
    inputs: &PassInputs<'_>,
    target: &mut RenderTarget,
    blend: BlendMode,
) {
    let width = target.width();
    let height = target.height();
    if width == 0 || height == 0 {
        return;
    }
    let format = target.format();
    let inv = Vec2::new(1.0 / width as f32, 1.0 / height as f32);

    let mut view = target.write();
    view.base_texels_mut()
        .par_chunks_mut(width as usize)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, px) in row.iter_mut().enumerate() {
                let frag = Fragment {
                    x: x as u32,
                    y: y as u32,
                    uv: Vec2::new(x as f32 + 0.5, y as f32 + 0.5) * inv,
                };
                let src = material.shade(frag, inputs);
                *px = format.store(blend.apply(*px, src));
            }
        });
}
