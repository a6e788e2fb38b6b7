//! demoseq is the frame scheduler and render-target compositing core of a real-time demo engine.
//!
//! A [`Timeline`] holds an ordered list of time-bounded events. Evaluating a frame decides which
//! events are active, hands each one its local progress, lets state events (camera shake, camera
//! override, terminate) feed later render events through a per-frame [`FrameContext`], and
//! letterboxes the last written render target onto the output surface.
//!
//! # Frame overview
//!
//! 1. **Reset**: clear the [`FrameContext`], every pool target and the depth buffer
//! 2. **Schedule**: run active events in array order with `t` and `prev_t` (optionally remapped)
//! 3. **Composite**: center the last written target on the output [`FrameRGBA`] without scaling
//!
//! Scene graphs and materials are collaborators behind the [`SceneGraph`] and [`MaterialSystem`]
//! traits. [`ShaderTable`] is a CPU reference material system built from Rust closures.
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Frame-stateless**: no context state survives from one `evaluate` call to the next, so any
//!   frame can be rendered in any order. Only particle clocks carry continuity across active
//!   frames.
//! - **Deterministic**: camera shake is a pure function of seed and absolute time.
#![forbid(unsafe_code)]

mod animation;
mod context;
mod event;
mod foundation;
mod material;
mod render;
mod scene;
mod timeline;

/// JSON timeline descriptions.
pub mod config;

pub use animation::curve::{Curve, CurveKey};
pub use animation::ease::Ease;
pub use animation::remap::{TimeRemapper, WaveShape, Waveform};
pub use context::{CameraOverride, FrameContext};
pub use event::camera_override::CameraOverrideEvent;
pub use event::effect::FullscreenEffectEvent;
pub use event::nested::NestedTimelineEvent;
pub use event::particles::ParticleUpdateEvent;
pub use event::scene_render::{ClearFlags, SceneRenderEvent};
pub use event::shake::CameraShakeEvent;
pub use event::terminate::TerminateEvent;
pub use event::{Event, EventClass, EventEnv, EventOutcome, EventSpec, EventStep};
pub use foundation::core::{Canvas, Fps, FrameIndex, FrameRange, Mat4, Rgba8Premul, Vec2, Vec3};
pub use foundation::error::{SeqError, SeqResult};
pub use foundation::math::{Rng64, seed_from_name};
pub use material::{
    Fragment, MaterialSystem, PassDescriptor, PassInputs, PassUniforms, ShaderFn, ShaderTable,
};
pub use render::composite::{
    FrameRGBA, Viewport, blit_frame_into, composite_letterboxed, letterbox_viewport,
};
pub use render::fullscreen::BlendMode;
pub use render::pool::{Binding, Bindings, PoolReader, RenderTargetPool};
pub use render::target::{
    DepthBuffer, MipLevel, PixelFormat, ReadView, RenderTarget, TargetDesc, TargetId, Texel,
    WriteView,
};
pub use scene::camera::{CameraPose, SceneView, ViewMatrices};
pub use scene::{CameraRef, ClipId, ObjectId, SceneGraph, SceneId, SceneRegistry, Simulation};
pub use timeline::{FrameStats, Timeline, TimelineBuilder};
