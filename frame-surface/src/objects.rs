//! Allocation seam between [`crate::SceneResources`] and the GL binding

use glow::HasContext;

use crate::{GlBuffer, GlProgram, GlVertexArray};

/// The create/delete subset of [`glow::HasContext`] that the resource bundle
/// needs. Keeping this behind a trait lets handle bookkeeping be exercised
/// against a counting double without a live OpenGL context; everything that
/// actually touches buffer contents or draw state is implemented directly on
/// `glow::Context`.
pub trait GlObjects {
    type Buffer: Copy;
    type VertexArray: Copy;
    type Program: Copy;

    fn create_buffer(&self) -> Result<Self::Buffer, String>;
    fn delete_buffer(&self, buffer: Self::Buffer);
    fn create_vertex_array(&self) -> Result<Self::VertexArray, String>;
    fn delete_vertex_array(&self, vertex_array: Self::VertexArray);
    fn delete_program(&self, program: Self::Program);
}

impl GlObjects for glow::Context {
    type Buffer = GlBuffer;
    type VertexArray = GlVertexArray;
    type Program = GlProgram;

    fn create_buffer(&self) -> Result<GlBuffer, String> {
        unsafe { HasContext::create_buffer(self) }
    }

    fn delete_buffer(&self, buffer: GlBuffer) {
        unsafe { HasContext::delete_buffer(self, buffer) }
    }

    fn create_vertex_array(&self) -> Result<GlVertexArray, String> {
        unsafe { HasContext::create_vertex_array(self) }
    }

    fn delete_vertex_array(&self, vertex_array: GlVertexArray) {
        unsafe { HasContext::delete_vertex_array(self, vertex_array) }
    }

    fn delete_program(&self, program: GlProgram) {
        unsafe { HasContext::delete_program(self, program) }
    }
}
