use std::path::Path;

use crate::{
    foundation::core::{Canvas, Rgba8Premul},
    foundation::error::{SeqError, SeqResult},
    render::target::{ReadView, Texel, WriteView},
};

/// Final composited image: premultiplied RGBA8, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRGBA {
    pub fn new(canvas: Canvas, clear: Rgba8Premul) -> Self {
        let mut frame = Self {
            width: canvas.width,
            height: canvas.height,
            data: vec![0; canvas.width as usize * canvas.height as usize * 4],
            premultiplied: true,
        };
        frame.clear(clear);
        frame
    }

    pub fn clear(&mut self, color: Rgba8Premul) {
        let px = color.to_array();
        for chunk in self.data.chunks_exact_mut(4) {
            chunk.copy_from_slice(&px);
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Writes the frame as a PNG, un-premultiplying color first.
    pub fn save_png(&self, path: impl AsRef<Path>) -> SeqResult<()> {
        let mut straight = self.data.clone();
        if self.premultiplied {
            for px in straight.chunks_exact_mut(4) {
                let a = u16::from(px[3]);
                if a == 0 {
                    continue;
                }
                for c in &mut px[..3] {
                    *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
                }
            }
        }
        let img = image::RgbaImage::from_raw(self.width, self.height, straight)
            .ok_or_else(|| SeqError::render("frame buffer does not match its dimensions"))?;
        img.save(path.as_ref())
            .map_err(|e| SeqError::Other(anyhow::Error::new(e)))
    }
}

/// Destination rectangle of the final blit. The origin may be negative when the source is larger
/// than the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

/// Centers a `(tw, th)` image on a `(sw, sh)` surface without scaling.
pub fn letterbox_viewport(target: (u32, u32), surface: (u32, u32)) -> Viewport {
    let (tw, th) = (i64::from(target.0), i64::from(target.1));
    let (sw, sh) = (i64::from(surface.0), i64::from(surface.1));
    Viewport {
        x: (sw - tw) / 2,
        y: (sh - th) / 2,
        width: target.0,
        height: target.1,
    }
}

fn texel_to_rgba8(px: Texel) -> [u8; 4] {
    px.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
}

/// Visits every `(src, dst)` coordinate pair of a viewport that lands inside the surface.
fn for_each_visible(
    vp: Viewport,
    surface: (u32, u32),
    mut f: impl FnMut((u32, u32), (u32, u32)),
) {
    let x0 = vp.x.max(0);
    let y0 = vp.y.max(0);
    let x1 = (vp.x + i64::from(vp.width)).min(i64::from(surface.0));
    let y1 = (vp.y + i64::from(vp.height)).min(i64::from(surface.1));
    for dy in y0..y1 {
        for dx in x0..x1 {
            let src = ((dx - vp.x) as u32, (dy - vp.y) as u32);
            f(src, (dx as u32, dy as u32));
        }
    }
}

/// Pass-through copy of `src` into the letterboxed viewport of `dst`.
///
/// Pixels outside the viewport keep their cleared value; parts of a source larger than the
/// surface are cropped.
pub fn composite_letterboxed(src: ReadView<'_>, dst: &mut FrameRGBA) -> Viewport {
    let surface = (dst.width, dst.height);
    let vp = letterbox_viewport((src.width(), src.height()), surface);
    let stride = dst.width as usize;
    for_each_visible(vp, surface, |(sx, sy), (dx, dy)| {
        let px = texel_to_rgba8(src.fetch(i64::from(sx), i64::from(sy)));
        let i = (dy as usize * stride + dx as usize) * 4;
        dst.data[i..i + 4].copy_from_slice(&px);
    });
    vp
}

/// Letterboxed copy of an RGBA8 frame into a render target.
pub fn blit_frame_into(src: &FrameRGBA, dst: &mut WriteView<'_>) -> Viewport {
    let surface = (dst.width(), dst.height());
    let vp = letterbox_viewport((src.width, src.height), surface);
    for_each_visible(vp, surface, |(sx, sy), (dx, dy)| {
        if let Some(px) = src.pixel(sx, sy) {
            dst.put(dx, dy, px.map(|c| f32::from(c) / 255.0));
        }
    });
    vp
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
