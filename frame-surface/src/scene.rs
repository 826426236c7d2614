//! Ownership record for the surface's GPU resources

use glow::HasContext;
use tracing::{debug, warn};

use crate::error::{InitError, InitResult};
use crate::geometry::{COLOR_ATTRIB, POSITION_ATTRIB, SceneGeometry};
use crate::objects::GlObjects;

/// Byte stride of one position (vec2 of f32).
const POSITION_STRIDE: i32 = 2 * std::mem::size_of::<f32>() as i32;
/// Byte stride of one color triple.
const COLOR_STRIDE: i32 = 3;

/// The shader program, the four fixed-purpose buffers, and the vertex-array
/// object, owned as a unit.
///
/// Allocated together, released together, exactly once: `destroy` is
/// idempotent and deletes the VAO before the buffers it references, then the
/// program. The bundle does not own the context, so dropping it without a
/// prior `destroy` can only log the leak.
pub struct SceneResources<G: GlObjects> {
    program: Option<G::Program>,
    vertex_buffer: Option<G::Buffer>,
    color_buffer: Option<G::Buffer>,
    index_buffer: Option<G::Buffer>,
    indirect_buffer: Option<G::Buffer>,
    vertex_array: Option<G::VertexArray>,
    destroyed: bool,
}

impl<G: GlObjects> SceneResources<G> {
    /// Creates the four buffer objects and the VAO, taking ownership of an
    /// already linked program. No storage is allocated yet; see
    /// [`SceneResources::upload`].
    pub fn allocate(gl: &G, program: G::Program) -> InitResult<Self> {
        let vertex_buffer = gl.create_buffer().map_err(InitError::CreateBufferObject)?;
        let color_buffer = gl.create_buffer().map_err(InitError::CreateBufferObject)?;
        let index_buffer = gl.create_buffer().map_err(InitError::CreateBufferObject)?;
        let indirect_buffer = gl.create_buffer().map_err(InitError::CreateBufferObject)?;
        let vertex_array = gl
            .create_vertex_array()
            .map_err(InitError::CreateVertexArray)?;

        Ok(Self {
            program: Some(program),
            vertex_buffer: Some(vertex_buffer),
            color_buffer: Some(color_buffer),
            index_buffer: Some(index_buffer),
            indirect_buffer: Some(indirect_buffer),
            vertex_array: Some(vertex_array),
            destroyed: false,
        })
    }

    /// Releases every handle exactly once, on the same context that created
    /// them. The VAO goes first since it references the buffers. Safe to
    /// call again; later calls are no-ops.
    pub fn destroy(&mut self, gl: &G) {
        if self.destroyed {
            return;
        }

        if let Some(vertex_array) = self.vertex_array.take() {
            gl.delete_vertex_array(vertex_array);
        }
        for buffer in [
            self.vertex_buffer.take(),
            self.color_buffer.take(),
            self.index_buffer.take(),
            self.indirect_buffer.take(),
        ]
        .into_iter()
        .flatten()
        {
            gl.delete_buffer(buffer);
        }
        if let Some(program) = self.program.take() {
            gl.delete_program(program);
        }

        self.destroyed = true;
        debug!("scene resources released");
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn program(&self) -> Option<G::Program> {
        self.program
    }

    pub fn vertex_array(&self) -> Option<G::VertexArray> {
        self.vertex_array
    }

    pub fn indirect_buffer(&self) -> Option<G::Buffer> {
        self.indirect_buffer
    }
}

impl SceneResources<glow::Context> {
    /// Allocates the bundle and seeds it with the given geometry.
    pub fn new(
        gl: &glow::Context,
        program: crate::GlProgram,
        geometry: &SceneGeometry,
    ) -> InitResult<Self> {
        let resources = Self::allocate(gl, program)?;
        resources.upload(gl, geometry);
        Ok(resources)
    }

    /// Seeds immutable storage for the four buffers and records the
    /// attribute layout in the VAO. Called once; the storage flags are 0, so
    /// none of the buffers can be rewritten afterwards.
    pub fn upload(&self, gl: &glow::Context, geometry: &SceneGeometry) {
        unsafe {
            gl.bind_vertex_array(self.vertex_array);

            gl.bind_buffer(glow::ARRAY_BUFFER, self.vertex_buffer);
            gl.buffer_storage(
                glow::ARRAY_BUFFER,
                geometry.position_bytes().len() as i32,
                Some(geometry.position_bytes()),
                0,
            );
            gl.enable_vertex_attrib_array(POSITION_ATTRIB);
            gl.vertex_attrib_pointer_f32(
                POSITION_ATTRIB,
                2,
                glow::FLOAT,
                false,
                POSITION_STRIDE,
                0,
            );

            gl.bind_buffer(glow::ARRAY_BUFFER, self.color_buffer);
            gl.buffer_storage(
                glow::ARRAY_BUFFER,
                geometry.color_bytes().len() as i32,
                Some(geometry.color_bytes()),
                0,
            );
            gl.enable_vertex_attrib_array(COLOR_ATTRIB);
            gl.vertex_attrib_pointer_f32(
                COLOR_ATTRIB,
                3,
                glow::UNSIGNED_BYTE,
                true,
                COLOR_STRIDE,
                0,
            );

            // The element binding is VAO state and must be made while the
            // VAO is still bound.
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, self.index_buffer);
            gl.buffer_storage(
                glow::ELEMENT_ARRAY_BUFFER,
                geometry.index_bytes().len() as i32,
                Some(geometry.index_bytes()),
                0,
            );

            gl.bind_buffer(glow::DRAW_INDIRECT_BUFFER, self.indirect_buffer);
            gl.buffer_storage(
                glow::DRAW_INDIRECT_BUFFER,
                geometry.indirect_bytes().len() as i32,
                Some(geometry.indirect_bytes()),
                0,
            );

            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
            gl.bind_buffer(glow::DRAW_INDIRECT_BUFFER, None);
        }

        debug!(
            vertices = geometry.vertex_count(),
            indices = geometry.indices.len(),
            "scene buffers seeded"
        );
    }
}

impl<G: GlObjects> Drop for SceneResources<G> {
    fn drop(&mut self) {
        if !self.destroyed {
            warn!("scene resources dropped without destroy(); GPU handles were not released");
        }
    }
}
