//! Heartline is a headless engine for an animated, scroll-driven greeting page.
//!
//! The host feeds a [`PageSession`] with scroll, resize, pointer, key and
//! display-refresh events; the session answers with section state and a
//! particle overlay that can be rasterized on the CPU.
//!
//! - Describe the page with a [`PageConfig`] (JSON, every field defaulted)
//! - Drive it with [`PageEvent`]s through [`PageSession::dispatch`]
//! - Render the overlay of the last frame with [`CpuRenderer`]
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod animation;
pub mod page;
pub mod particles;
pub mod render;
pub mod scroll;
pub mod visibility;

pub use crate::animation::ease::Ease;
pub use crate::foundation::color::{Palette, Rgba8};
pub use crate::foundation::core::{
    Affine, BezPath, Fps, FrameIndex, FrameRange, Point, Rect, Rgba8Premul, Size, Transform2D, Vec2,
    Viewport,
};
pub use crate::foundation::error::{HeartlineError, HeartlineResult};
pub use crate::foundation::math::{Rng64, UniformRange};

pub use crate::page::config::{PageConfig, PageLayout, SectionKind};
pub use crate::page::session::{PageEvent, PageSession, PageSnapshot, SessionTrace};
pub use crate::particles::engine::{EngineConfig, FrameSnapshot, LoopHandle, ParticleEngine};
pub use crate::render::cpu::CpuRenderer;
pub use crate::render::{FrameRGBA, RenderBackend, RenderSettings, render_frame};
pub use crate::visibility::engine::{
    IntersectionSupport, ObserveOpts, Reveal, RootMargin, SubscriptionId, VisibilityEngine,
};
