//! Fixed scene geometry and the indirect-draw parameter record

use bytemuck::{Pod, Zeroable};

/// Vertex attribute slot carrying 2D positions.
pub const POSITION_ATTRIB: u32 = 0;
/// Vertex attribute slot carrying normalized RGB colors.
pub const COLOR_ATTRIB: u32 = 1;

/// Number of vertices submitted by the raw point pass.
pub const POINT_VERTEX_COUNT: i32 = 6;

/// Parameters of a `glDrawElementsIndirect` call, read by the GPU from the
/// indirect buffer at draw time. Field order and width are fixed by the
/// OpenGL spec: five tightly packed u32s, 20 bytes.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
pub struct DrawElementsIndirectCommand {
    pub count: u32,
    pub instance_count: u32,
    pub first_index: u32,
    pub base_vertex: u32,
    pub base_instance: u32,
}

/// Seed data for the four immutable buffers.
///
/// Six vertices: the corners of a centered quad plus two points on the
/// vertical axis, so the 6-vertex point pass never reads past the positions
/// the buffer actually holds. The index list only references the quad
/// corners.
#[derive(Clone, Debug)]
pub struct SceneGeometry {
    /// 2D positions, two f32 per vertex.
    pub positions: [f32; 12],
    /// RGB colors, three u8 per vertex, normalized in the vertex shader.
    pub colors: [u8; 18],
    /// Triangle indices into `positions`, two triangles forming the quad.
    pub indices: [u8; 6],
    /// Single indirect-draw parameter record.
    pub indirect: DrawElementsIndirectCommand,
}

impl Default for SceneGeometry {
    fn default() -> Self {
        Self {
            positions: [
                -0.5, -0.5, //
                0.5, -0.5, //
                -0.5, 0.5, //
                0.5, 0.5, //
                0.0, -0.75, //
                0.0, 0.75,
            ],
            colors: [
                255, 0, 0, //
                0, 255, 0, //
                0, 0, 255, //
                0, 255, 255, //
                255, 255, 0, //
                255, 0, 255,
            ],
            indices: [0, 1, 2, 2, 1, 3],
            indirect: DrawElementsIndirectCommand {
                count: 6,
                instance_count: 1,
                first_index: 0,
                base_vertex: 0,
                base_instance: 0,
            },
        }
    }
}

impl SceneGeometry {
    /// Number of vertices the position buffer holds.
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 2
    }

    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    pub fn color_bytes(&self) -> &[u8] {
        &self.colors
    }

    pub fn index_bytes(&self) -> &[u8] {
        &self.indices
    }

    pub fn indirect_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(&self.indirect)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn indirect_command_is_the_documented_record() {
        let geometry = SceneGeometry::default();
        assert_eq!(
            geometry.indirect,
            DrawElementsIndirectCommand {
                count: 6,
                instance_count: 1,
                first_index: 0,
                base_vertex: 0,
                base_instance: 0,
            }
        );
    }

    #[test]
    fn indirect_command_layout_matches_the_gl_wire_format() {
        assert_eq!(std::mem::size_of::<DrawElementsIndirectCommand>(), 20);

        let geometry = SceneGeometry::default();
        let mut expected = Vec::new();
        for word in [6u32, 1, 0, 0, 0] {
            expected.extend_from_slice(&word.to_le_bytes());
        }
        assert_eq!(geometry.indirect_bytes(), expected.as_slice());
    }

    #[test]
    fn point_pass_stays_inside_the_position_buffer() {
        let geometry = SceneGeometry::default();
        assert_eq!(POINT_VERTEX_COUNT, 6);
        assert!(POINT_VERTEX_COUNT as usize <= geometry.vertex_count());
    }

    #[test]
    fn every_vertex_has_a_color_and_every_index_is_in_range() {
        let geometry = SceneGeometry::default();
        assert_eq!(geometry.colors.len(), geometry.vertex_count() * 3);
        assert!(
            geometry
                .indices
                .iter()
                .all(|&index| (index as usize) < geometry.vertex_count())
        );
        assert_eq!(geometry.indirect.count as usize, geometry.indices.len());
    }
}
