//! The frame surface: program + resources + frame cycle

use std::time::Duration;

use glow::HasContext;
use tracing::info;

use crate::error::{InitResult, RenderError, RenderResult};
use crate::frame::{DEFAULT_POINT_SIZE, FrameCycle, FramePhase};
use crate::geometry::{POINT_VERTEX_COUNT, SceneGeometry};
use crate::scene::SceneResources;
use crate::shader::{SceneProgram, ShaderSources};
use crate::GlUniformLocation;

/// Fixed parameters of the surface: the context attributes the shell must
/// request, the redraw cadence, and the initial render state.
#[derive(Clone, Debug)]
pub struct SurfaceConfig {
    /// Depth buffer size in bits.
    pub depth_buffer_bits: u8,
    /// Multisample count.
    pub multisample_count: u8,
    /// Requested OpenGL version, core profile.
    pub gl_version: (u8, u8),
    /// Interval of the repaint-request timer.
    pub redraw_interval: Duration,
    pub initial_point_size: f32,
    pub clear_color: [f32; 4],
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            depth_buffer_bits: 24,
            multisample_count: 4,
            gl_version: (4, 6),
            redraw_interval: Duration::from_millis(20),
            initial_point_size: DEFAULT_POINT_SIZE,
            clear_color: [0.0, 0.0, 0.0, 0.0],
        }
    }
}

/// Owns the scene program, the GPU resource bundle, and the frame cycle, and
/// issues the raw-geometry part of every frame.
///
/// The UI overlay is rendered by the caller *after* [`FrameSurface::render_scene`]
/// and before [`FrameSurface::finish_frame`], which keeps the UI on top.
pub struct FrameSurface {
    scene: SceneResources<glow::Context>,
    point_size_uniform: Option<GlUniformLocation>,
    cycle: FrameCycle,
    clear_color: [f32; 4],
}

impl FrameSurface {
    /// Compiles and links the program, allocates and seeds the resource
    /// bundle, and enables program-controlled point size. Fatal on shader
    /// compile failure; no fallback program is installed.
    pub fn new(
        gl: &glow::Context,
        sources: &ShaderSources,
        geometry: &SceneGeometry,
        config: &SurfaceConfig,
    ) -> InitResult<Self> {
        let program = SceneProgram::new(gl, sources)?;
        let scene = SceneResources::new(gl, program.program, geometry)?;

        unsafe {
            gl.use_program(scene.program());
            // Point size comes from the vertex shader, not fixed-function state.
            gl.enable(glow::PROGRAM_POINT_SIZE);
        }

        info!(
            point_size = config.initial_point_size,
            "frame surface initialized"
        );

        Ok(Self {
            scene,
            point_size_uniform: program.point_size,
            cycle: FrameCycle::with_point_size(config.initial_point_size),
            clear_color: config.clear_color,
        })
    }

    /// Timer notification; returns whether the shell should request a repaint.
    pub fn tick(&mut self) -> bool {
        self.cycle.tick()
    }

    /// Steps 1–4 of the frame: clear, apply the sampled point size, draw the
    /// raw points, then the indirect indexed triangles. Returns the point
    /// size this frame rasterizes with. The UI pass follows in the caller.
    pub fn render_scene(&mut self, gl: &glow::Context) -> RenderResult<f32> {
        if self.scene.is_destroyed() {
            return Err(RenderError::SurfaceDestroyed);
        }

        let point_size = self.cycle.begin_frame();

        unsafe {
            let [r, g, b, a] = self.clear_color;
            gl.clear_color(r, g, b, a);
            gl.clear(glow::COLOR_BUFFER_BIT);

            gl.use_program(self.scene.program());
            gl.uniform_1_f32(self.point_size_uniform.as_ref(), point_size);

            gl.bind_vertex_array(self.scene.vertex_array());
            gl.bind_buffer(glow::DRAW_INDIRECT_BUFFER, self.scene.indirect_buffer());

            gl.draw_arrays(glow::POINTS, 0, POINT_VERTEX_COUNT);
            gl.draw_elements_indirect_offset(glow::TRIANGLES, glow::UNSIGNED_BYTE, 0);

            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::DRAW_INDIRECT_BUFFER, None);
        }

        Ok(point_size)
    }

    /// Marks the end of the paint callback, after the UI pass was submitted.
    pub fn finish_frame(&mut self) {
        self.cycle.finish_frame();
    }

    /// Commits a new point size (clamped); effective from the next frame.
    pub fn set_point_size(&mut self, size: f32) -> f32 {
        self.cycle.set_point_size(size)
    }

    pub fn point_size(&self) -> f32 {
        self.cycle.point_size()
    }

    pub fn phase(&self) -> FramePhase {
        self.cycle.phase()
    }

    /// Releases every GPU handle exactly once; later calls are no-ops.
    /// The caller must make the owning context current first. Rendering
    /// after shutdown fails with [`RenderError::SurfaceDestroyed`].
    pub fn shutdown(&mut self, gl: &glow::Context) {
        if !self.scene.is_destroyed() {
            info!("frame surface shutting down");
        }
        self.scene.destroy(gl);
    }

    pub fn is_shut_down(&self) -> bool {
        self.scene.is_destroyed()
    }
}
