//! Programmable software rasterizer
//!
//! Features:
//! - Vertex / varyings / fragment stages supplied by the caller
//! - Whole-triangle view-volume and back-face culling
//! - Screen-space (affine) interpolation, no perspective correction
//! - Early Z with a strict less-than test

mod context;
mod image;
mod math;
mod program;
mod render;
mod sampling;

pub use context::*;
pub use self::image::*;
pub use math::*;
pub use program::*;
pub use render::*;
pub use sampling::*;
