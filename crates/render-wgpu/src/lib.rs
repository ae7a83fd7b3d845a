//! wgpu backend for the cube showcase.
//!
//! Draws each cube twice, inner faces then outer faces, with alpha blending
//! so the shells read as translucent from both sides.
//!
//! # Invariants
//! - All vertex, index and uniform buffers are created once in
//!   [`WgpuCubeRenderer::new`]; only the depth texture follows resizes.
//! - Shader validation errors fail construction instead of producing a
//!   renderer that draws nothing.

mod context;
mod gpu;
mod shaders;

pub use context::GpuContext;
pub use gpu::{GpuError, WgpuCubeRenderer, WgpuFrame};
