//! Rendering core: geometry, transforms, and the per-frame draw sequence.
//!
//! # Invariants
//! - Exactly [`CUBE_COUNT`] cubes, each drawn twice per frame (front faces
//!   culled, then back faces culled).
//! - Shared frame uniforms are uploaded before the first draw of a frame.
//! - The renderer never touches control options; it only reads them.
//!
//! GPU backends implement [`CubeBackend`]; [`RecordingBackend`] records the
//! command stream for logging and tests.

mod camera;
mod geometry;
mod renderer;

pub use camera::Camera;
pub use geometry::{CUBE_COUNT, CUBE_SPACING, CubeGeometry, INDEX_COUNT, VERTEX_ALPHA};
pub use renderer::{
    Command, CubeBackend, CullFace, FrameRenderer, FrameUniforms, ObjectUniforms,
    RecordingBackend,
};
