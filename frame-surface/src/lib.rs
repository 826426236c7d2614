//! GPU resource lifecycle and frame-loop core for a glow-backed demo surface.
//!
//! This crate owns the part of the demo that is worth keeping honest: a fixed
//! set of immutable GPU buffers plus a vertex-array object ([`SceneResources`]),
//! a shader program compiled once from disk ([`ShaderSources`], [`SceneProgram`]),
//! and an explicit frame state machine ([`FrameCycle`]) that makes the
//! timer → redraw-request → paint contract testable, including the one-frame
//! lag between a UI point-size write and the size actually rasterized.
//!
//! Windowing, input, and the immediate-mode UI overlay live in the demo
//! binary; this crate only needs a current OpenGL context.
//!
//! ```rust,no_run
//! use frame_surface::{FrameSurface, SceneGeometry, ShaderSources, SurfaceConfig};
//!
//! # fn run(gl: &glow::Context) -> frame_surface::InitResult<()> {
//! let sources = ShaderSources::load("shaders/scene.vert", "shaders/scene.frag")?;
//! let config = SurfaceConfig::default();
//! let mut surface = FrameSurface::new(gl, &sources, &SceneGeometry::default(), &config)?;
//!
//! // per frame, after the timer requested a repaint:
//! // surface.render_scene(gl)?;   // clear + points + indirect triangles
//! // ... build and render the UI overlay ...
//! // surface.finish_frame();
//!
//! surface.shutdown(gl);
//! # Ok(())
//! # }
//! ```

// Re-export glow so callers use the same version as the renderer.
pub use glow;
use glow::HasContext;

mod error;
mod frame;
mod geometry;
mod objects;
mod scene;
mod shader;
mod surface;

pub use error::{InitError, InitResult, RenderError, RenderResult};
pub use frame::{
    DEFAULT_POINT_SIZE, FrameCycle, FramePhase, POINT_SIZE_MAX, POINT_SIZE_MIN,
};
pub use geometry::{
    COLOR_ATTRIB, DrawElementsIndirectCommand, POINT_VERTEX_COUNT, POSITION_ATTRIB, SceneGeometry,
};
pub use objects::GlObjects;
pub use scene::SceneResources;
pub use shader::{SceneProgram, ShaderSources};
pub use surface::{FrameSurface, SurfaceConfig};

pub type GlBuffer = <glow::Context as HasContext>::Buffer;
pub type GlShader = <glow::Context as HasContext>::Shader;
pub type GlVertexArray = <glow::Context as HasContext>::VertexArray;
pub type GlProgram = <glow::Context as HasContext>::Program;
pub type GlUniformLocation = <glow::Context as HasContext>::UniformLocation;
