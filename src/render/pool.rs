use smallvec::SmallVec;

use crate::{
    foundation::error::{SeqError, SeqResult},
    render::target::{
        DepthBuffer, PixelFormat, ReadView, RenderTarget, TargetDesc, TargetId, WriteView,
    },
};

/// Input binding after aliasing resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Binding {
    Unbound,
    Target(TargetId),
    /// The slot aliased the pass output and reads the scratch copy instead.
    Scratch,
}

/// Resolved input bindings for one pass. Four slots cover every built-in pass without spilling.
pub type Bindings = SmallVec<[Binding; 4]>;

/// Fixed set of render targets plus the scratch target used to break read/write aliasing.
///
/// Targets are allocated once from their descriptors and never resized. The scratch target is sized
/// to the largest width, height and mip count in the pool and is not reachable through any
/// [`TargetId`].
#[derive(Debug)]
pub struct RenderTargetPool {
    targets: Vec<RenderTarget>,
    scratch: RenderTarget,
    depth: DepthBuffer,
    last_written: Option<TargetId>,
    aliasing_resolutions: u32,
}

impl RenderTargetPool {
    pub fn new(descs: &[TargetDesc]) -> SeqResult<Self> {
        let targets = descs
            .iter()
            .map(|d| RenderTarget::new(*d))
            .collect::<SeqResult<Vec<_>>>()?;

        let max_w = descs.iter().map(|d| d.width).max().unwrap_or(1);
        let max_h = descs.iter().map(|d| d.height).max().unwrap_or(1);
        let max_mips = descs.iter().map(|d| d.mip_count).max().unwrap_or(1);
        let scratch = RenderTarget::new(
            TargetDesc::new(max_w, max_h, PixelFormat::Rgba32Float).with_mips(max_mips),
        )?;

        tracing::debug!(
            targets = targets.len(),
            scratch_w = max_w,
            scratch_h = max_h,
            scratch_mips = max_mips,
            "allocated render target pool"
        );

        Ok(Self {
            targets,
            scratch,
            depth: DepthBuffer::new(max_w, max_h),
            last_written: None,
            aliasing_resolutions: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn get(&self, id: TargetId) -> Option<&RenderTarget> {
        self.targets.get(id.index())
    }

    /// Construction-time check that `id` addresses a pool target.
    pub fn check(&self, id: TargetId) -> SeqResult<()> {
        if id.index() >= self.targets.len() {
            return Err(SeqError::validation(format!(
                "render target {} is outside the pool ({} targets)",
                id.0,
                self.targets.len()
            )));
        }
        Ok(())
    }

    pub fn last_written(&self) -> Option<TargetId> {
        self.last_written
    }

    pub(crate) fn mark_written(&mut self, id: TargetId) {
        self.last_written = Some(id);
    }

    /// Number of passes this frame whose inputs aliased their output.
    pub fn aliasing_resolutions(&self) -> u32 {
        self.aliasing_resolutions
    }

    pub fn depth(&self) -> &DepthBuffer {
        &self.depth
    }

    /// Clears every target and the depth buffer and forgets the last written target.
    pub(crate) fn begin_frame(&mut self) {
        for t in &mut self.targets {
            t.clear([0.0; 4]);
        }
        self.depth.clear();
        self.last_written = None;
        self.aliasing_resolutions = 0;
    }

    /// Resolves a pass's declared inputs against its output.
    ///
    /// Any slot naming `output` is redirected to the scratch target, which receives a copy of
    /// `output`'s current contents, mip chain included, first. The declared inputs are left
    /// untouched, so the next pass resolves from the original bindings again.
    pub fn resolve_inputs(&mut self, inputs: &[Option<TargetId>], output: TargetId) -> Bindings {
        let mut aliased = false;
        let bindings: Bindings = inputs
            .iter()
            .map(|slot| match *slot {
                None => Binding::Unbound,
                Some(id) if id == output => {
                    aliased = true;
                    Binding::Scratch
                }
                Some(id) => Binding::Target(id),
            })
            .collect();

        if aliased && let Some(src) = self.targets.get(output.index()) {
            tracing::trace!(target_id = output.0, "input aliases output, copying to scratch");
            self.scratch.copy_from(src);
            self.aliasing_resolutions = self.aliasing_resolutions.saturating_add(1);
        }
        bindings
    }

    /// Runs `f` with `id` taken out of the pool for writing while the rest stays readable.
    ///
    /// Returns `None` when `id` is not a pool target.
    pub fn with_target_mut<R>(
        &mut self,
        id: TargetId,
        f: impl FnOnce(&mut RenderTarget, PoolReader<'_>) -> R,
    ) -> Option<R> {
        let slot = self.targets.get_mut(id.index())?;
        let mut target = std::mem::replace(slot, RenderTarget::vacant());
        let out = f(
            &mut target,
            PoolReader {
                targets: &self.targets,
                scratch: &self.scratch,
            },
        );
        self.targets[id.index()] = target;
        Some(out)
    }

    /// Write view of `id` together with the shared depth buffer, for scene draws.
    pub fn target_and_depth_mut(
        &mut self,
        id: TargetId,
    ) -> Option<(WriteView<'_>, &mut DepthBuffer)> {
        let target = self.targets.get_mut(id.index())?;
        Some((target.write(), &mut self.depth))
    }

    pub fn write(&mut self, id: TargetId) -> Option<WriteView<'_>> {
        self.targets.get_mut(id.index()).map(RenderTarget::write)
    }

    pub fn regenerate_mips(&mut self, id: TargetId) {
        if let Some(t) = self.targets.get_mut(id.index())
            && t.mip_count() > 1
        {
            t.regenerate_mips();
        }
    }
}

/// Read access to the pool while one target is checked out for writing.
#[derive(Clone, Copy, Debug)]
pub struct PoolReader<'a> {
    targets: &'a [RenderTarget],
    scratch: &'a RenderTarget,
}

impl<'a> PoolReader<'a> {
    pub fn view(&self, binding: Binding) -> Option<ReadView<'a>> {
        match binding {
            Binding::Unbound => None,
            Binding::Target(id) => self.targets.get(id.index()).map(RenderTarget::read),
            Binding::Scratch => Some(self.scratch.read()),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pool.rs"]
mod tests;
