use rayon::prelude::*;

use crate::foundation::error::{SeqError, SeqResult};

/// Texel value: premultiplied RGBA, linear floats.
pub type Texel = [f32; 4];

/// Index of a target inside a [`RenderTargetPool`](crate::RenderTargetPool).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct TargetId(pub u32);

impl TargetId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Storage format of a render target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelFormat {
    /// 8 bits per channel; writes are clamped to `[0, 1]` and rounded to 1/255 steps.
    #[default]
    Rgba8Unorm,
    /// Full float; writes are stored as-is.
    Rgba32Float,
}

impl PixelFormat {
    pub fn store(self, px: Texel) -> Texel {
        match self {
            Self::Rgba8Unorm => px.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() / 255.0),
            Self::Rgba32Float => px,
        }
    }
}

/// Allocation descriptor for one pool target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TargetDesc {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub format: PixelFormat,
    #[serde(default = "default_mip_count")]
    pub mip_count: u32,
}

fn default_mip_count() -> u32 {
    1
}

impl TargetDesc {
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            width,
            height,
            format,
            mip_count: 1,
        }
    }

    pub fn with_mips(mut self, mip_count: u32) -> Self {
        self.mip_count = mip_count;
        self
    }

    /// Longest possible chain for this resolution, down to 1x1.
    pub fn max_mip_count(&self) -> u32 {
        32 - self.width.max(self.height).max(1).leading_zeros()
    }

    pub fn validate(&self) -> SeqResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SeqError::validation(format!(
                "render target must not be zero-sized (got {}x{})",
                self.width, self.height
            )));
        }
        if self.mip_count == 0 || self.mip_count > self.max_mip_count() {
            return Err(SeqError::validation(format!(
                "render target {}x{} supports 1..={} mip levels (got {})",
                self.width,
                self.height,
                self.max_mip_count(),
                self.mip_count
            )));
        }
        Ok(())
    }
}

/// One level of a target's mip chain.
#[derive(Clone, Debug, Default)]
pub struct MipLevel {
    width: u32,
    height: u32,
    texels: Vec<Texel>,
}

impl MipLevel {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            texels: vec![[0.0; 4]; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn texels(&self) -> &[Texel] {
        &self.texels
    }

    /// Texel fetch with clamp-to-edge addressing.
    pub fn fetch(&self, x: i64, y: i64) -> Texel {
        if self.texels.is_empty() {
            return [0.0; 4];
        }
        let x = x.clamp(0, i64::from(self.width) - 1) as usize;
        let y = y.clamp(0, i64::from(self.height) - 1) as usize;
        self.texels[y * self.width as usize + x]
    }

    /// Bilinear sample at normalized coordinates, texel centers at `(i + 0.5) / size`.
    pub fn sample(&self, u: f32, v: f32) -> Texel {
        let fx = u * self.width as f32 - 0.5;
        let fy = v * self.height as f32 - 0.5;
        let x0 = fx.floor();
        let y0 = fy.floor();
        let tx = fx - x0;
        let ty = fy - y0;
        let (x0, y0) = (x0 as i64, y0 as i64);

        let a = self.fetch(x0, y0);
        let b = self.fetch(x0 + 1, y0);
        let c = self.fetch(x0, y0 + 1);
        let d = self.fetch(x0 + 1, y0 + 1);
        std::array::from_fn(|i| {
            let top = a[i] + (b[i] - a[i]) * tx;
            let bottom = c[i] + (d[i] - c[i]) * tx;
            top + (bottom - top) * ty
        })
    }

    fn downsample_from(&mut self, src: &MipLevel, format: PixelFormat) {
        let width = self.width as usize;
        self.texels
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, out) in row.iter_mut().enumerate() {
                    let sx = (x * 2) as i64;
                    let sy = (y * 2) as i64;
                    let quad = [
                        src.fetch(sx, sy),
                        src.fetch(sx + 1, sy),
                        src.fetch(sx, sy + 1),
                        src.fetch(sx + 1, sy + 1),
                    ];
                    *out = format.store(std::array::from_fn(|i| {
                        (quad[0][i] + quad[1][i] + quad[2][i] + quad[3][i]) * 0.25
                    }));
                }
            });
    }
}

/// Offscreen image with a fixed resolution and an optional mip chain.
///
/// Reads go through [`ReadView`] and writes through [`WriteView`]; the borrow rules keep a single
/// target from being both at once.
#[derive(Clone, Debug)]
pub struct RenderTarget {
    desc: TargetDesc,
    levels: Vec<MipLevel>,
}

impl RenderTarget {
    pub fn new(desc: TargetDesc) -> SeqResult<Self> {
        desc.validate()?;
        let mut levels = Vec::with_capacity(desc.mip_count as usize);
        let (mut w, mut h) = (desc.width, desc.height);
        for _ in 0..desc.mip_count {
            levels.push(MipLevel::new(w, h));
            w = (w / 2).max(1);
            h = (h / 2).max(1);
        }
        Ok(Self { desc, levels })
    }

    /// Zero-sized stand-in left in a pool slot while the real target is being written.
    pub(crate) fn vacant() -> Self {
        Self {
            desc: TargetDesc::new(0, 0, PixelFormat::Rgba32Float),
            levels: vec![MipLevel::default()],
        }
    }

    pub fn desc(&self) -> &TargetDesc {
        &self.desc
    }

    pub fn width(&self) -> u32 {
        self.desc.width
    }

    pub fn height(&self) -> u32 {
        self.desc.height
    }

    pub fn format(&self) -> PixelFormat {
        self.desc.format
    }

    pub fn mip_count(&self) -> u32 {
        self.desc.mip_count
    }

    pub fn level(&self, level: u32) -> Option<&MipLevel> {
        self.levels.get(level as usize)
    }

    pub fn read(&self) -> ReadView<'_> {
        ReadView { target: self }
    }

    pub fn write(&mut self) -> WriteView<'_> {
        WriteView { target: self }
    }

    pub fn clear(&mut self, color: Texel) {
        let color = self.desc.format.store(color);
        for level in &mut self.levels {
            level.texels.fill(color);
        }
    }

    /// Rebuilds every level below the base with a 2x2 box filter, stored through the format.
    pub fn regenerate_mips(&mut self) {
        let format = self.desc.format;
        for i in 1..self.levels.len() {
            let (done, rest) = self.levels.split_at_mut(i);
            rest[0].downsample_from(&done[i - 1], format);
        }
    }

    /// Copies every level of `src` into this target, adopting its extent and mip count.
    ///
    /// Only used for the pool's scratch target. Texels are copied verbatim, so a float scratch
    /// holds an exact copy of any source format.
    pub(crate) fn copy_from(&mut self, src: &RenderTarget) {
        self.levels.resize_with(src.levels.len(), MipLevel::default);
        for (dst, level) in self.levels.iter_mut().zip(&src.levels) {
            dst.width = level.width;
            dst.height = level.height;
            dst.texels.clear();
            dst.texels.extend_from_slice(&level.texels);
        }
        self.desc.width = src.desc.width;
        self.desc.height = src.desc.height;
        self.desc.mip_count = src.desc.mip_count;
    }
}

/// Readable view of a render target.
#[derive(Clone, Copy, Debug)]
pub struct ReadView<'a> {
    target: &'a RenderTarget,
}

impl<'a> ReadView<'a> {
    pub fn width(&self) -> u32 {
        self.target.width()
    }

    pub fn height(&self) -> u32 {
        self.target.height()
    }

    pub fn base(&self) -> &'a MipLevel {
        &self.target.levels[0]
    }

    pub fn fetch(&self, x: i64, y: i64) -> Texel {
        self.base().fetch(x, y)
    }

    pub fn sample(&self, u: f32, v: f32) -> Texel {
        self.base().sample(u, v)
    }

    /// Samples mip `level`, clamped to the last available level.
    pub fn sample_level(&self, u: f32, v: f32, level: u32) -> Texel {
        let last = self.target.levels.len() - 1;
        self.target.levels[(level as usize).min(last)].sample(u, v)
    }
}

/// Writable view of a render target's base level.
#[derive(Debug)]
pub struct WriteView<'a> {
    target: &'a mut RenderTarget,
}

impl WriteView<'_> {
    pub fn width(&self) -> u32 {
        self.target.width()
    }

    pub fn height(&self) -> u32 {
        self.target.height()
    }

    pub fn format(&self) -> PixelFormat {
        self.target.format()
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Texel> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some(self.target.levels[0].texels[(y * self.width() + x) as usize])
    }

    /// Stores one texel through the target's format. Out-of-bounds writes are dropped.
    pub fn put(&mut self, x: u32, y: u32, px: Texel) {
        if x >= self.width() || y >= self.height() {
            return;
        }
        let idx = (y * self.width() + x) as usize;
        self.target.levels[0].texels[idx] = self.target.desc.format.store(px);
    }

    pub fn fill(&mut self, px: Texel) {
        let px = self.target.desc.format.store(px);
        self.target.levels[0].texels.fill(px);
    }

    /// Raw base level for bulk writers. Callers are responsible for format quantization.
    pub(crate) fn base_texels_mut(&mut self) -> &mut [Texel] {
        &mut self.target.levels[0].texels
    }
}

/// Depth attachment shared by scene renders, cleared to the far plane (`1.0`) each frame.
#[derive(Clone, Debug)]
pub struct DepthBuffer {
    width: u32,
    height: u32,
    values: Vec<f32>,
}

impl DepthBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            values: vec![1.0; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn clear(&mut self) {
        self.values.fill(1.0);
    }

    pub fn get(&self, x: u32, y: u32) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.values[(y * self.width + x) as usize])
    }

    /// Less-than depth test; stores `z` and returns `true` when it passes.
    pub fn test_and_set(&mut self, x: u32, y: u32, z: f32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let slot = &mut self.values[(y * self.width + x) as usize];
        if z < *slot {
            *slot = z;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/target.rs"]
mod tests;
