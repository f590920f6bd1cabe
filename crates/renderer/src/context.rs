//! Render context: program + geometry + rotation state in one place.
//!
//! Replaces the process-wide program/VBO globals of the original demos
//! with a single struct created at startup, borrowed by the frame
//! callback, and destroyed exactly once at shutdown.

use asset::mesh::MeshData;
use corelib::spin::RotationState;
use corelib::Result;

use crate::api::{BufferHandle, GraphicsApi};
use crate::program::ShaderProgram;

/// Per-vertex position input name expected in the vertex shader.
pub const ATTR_POSITION: &str = "position";
/// Per-vertex color input name used by the triangle demo.
pub const ATTR_COLOR: &str = "vColor";
/// Uniform receiving the per-frame rotation matrix.
pub const UNIFORM_ROTATION: &str = "rotationMatrix";

const CLEAR_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Demo triangle geometry, same as the original fixed arrays.
const TRIANGLE_POSITIONS: [[f32; 3]; 3] = [[-1.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
const TRIANGLE_COLORS: [[f32; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

#[derive(Clone, Copy, Debug)]
enum DrawMode {
    /// Non-indexed array draw (triangle demo).
    Arrays { vertex_count: u32 },
    /// Indexed draw (loaded mesh).
    Indexed { indices: BufferHandle, index_count: u32 },
}

/// Everything the frame callback needs, owned in one place.
pub struct RenderContext {
    program: ShaderProgram,
    buffers: Vec<BufferHandle>,
    mode: DrawMode,
    rotation: RotationState,
}

impl RenderContext {
    /// Built-in demo: one colored triangle, non-indexed draw.
    pub fn for_triangle<A: GraphicsApi>(api: &mut A, program: ShaderProgram) -> Result<Self> {
        let positions = api.create_vertex_buffer(&TRIANGLE_POSITIONS)?;
        let colors = api.create_vertex_buffer(&TRIANGLE_COLORS)?;
        if program.bind_attribute(api, positions, ATTR_POSITION).is_none() {
            log::warn!("attribute '{ATTR_POSITION}' is not active in the shader");
        }
        if program.bind_attribute(api, colors, ATTR_COLOR).is_none() {
            log::warn!("attribute '{ATTR_COLOR}' is not active in the shader");
        }
        Ok(Self {
            program,
            buffers: vec![positions, colors],
            mode: DrawMode::Arrays {
                vertex_count: TRIANGLE_POSITIONS.len() as u32,
            },
            rotation: RotationState::default(),
        })
    }

    /// Loaded mesh: upload positions and triangle indices, indexed draw.
    pub fn for_mesh<A: GraphicsApi>(
        api: &mut A,
        program: ShaderProgram,
        mesh: &MeshData,
    ) -> Result<Self> {
        let positions = api.create_vertex_buffer(&mesh.positions)?;
        let indices = api.create_index_buffer(&mesh.indices)?;
        if program.bind_attribute(api, positions, ATTR_POSITION).is_none() {
            log::warn!("attribute '{ATTR_POSITION}' is not active in the shader");
        }
        log::info!(
            "Mesh uploaded: {} vertices, {} triangles",
            mesh.vertex_count(),
            mesh.triangle_count()
        );
        Ok(Self {
            program,
            buffers: vec![positions, indices],
            mode: DrawMode::Indexed {
                indices,
                index_count: mesh.indices.len() as u32,
            },
            rotation: RotationState::default(),
        })
    }

    /// Current rotation angle in degrees.
    pub fn angle(&self) -> f32 {
        self.rotation.angle()
    }

    /// Draw one frame: clear, upload the rotation matrix, one draw call,
    /// advance the angle.
    pub fn render_frame<A: GraphicsApi>(&mut self, api: &mut A) {
        api.clear(CLEAR_COLOR);
        self.program
            .set_uniform_matrix4(api, UNIFORM_ROTATION, &self.rotation.matrix());
        match self.mode {
            DrawMode::Arrays { vertex_count } => api.draw_triangles(vertex_count),
            DrawMode::Indexed { indices, index_count } => {
                api.draw_indexed_triangles(indices, index_count)
            }
        }
        self.rotation.advance();
    }

    /// Delete the buffers, then the program. Runs exactly once.
    pub fn destroy<A: GraphicsApi>(self, api: &mut A) {
        for buffer in self.buffers {
            api.delete_buffer(buffer);
        }
        self.program.destroy(api);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::CompiledShader;
    use crate::recording::{Call, RecordingApi};
    use corelib::ShaderStage;

    fn demo_api() -> RecordingApi {
        RecordingApi::new()
            .with_attribute(ATTR_POSITION)
            .with_attribute(ATTR_COLOR)
            .with_uniform(UNIFORM_ROTATION)
    }

    fn linked_program(api: &mut RecordingApi) -> ShaderProgram {
        let vertex =
            CompiledShader::from_source(api, ShaderStage::Vertex, "void main() {}").unwrap();
        let fragment =
            CompiledShader::from_source(api, ShaderStage::Fragment, "void main() {}").unwrap();
        ShaderProgram::link(api, vertex, fragment).unwrap()
    }

    fn tiny_mesh() -> MeshData {
        MeshData::new(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]],
            vec![0, 1, 2, 1, 3, 2],
        )
    }

    #[test]
    fn triangle_frame_clears_uploads_and_draws() {
        let mut api = demo_api();
        let program = linked_program(&mut api);
        let mut ctx = RenderContext::for_triangle(&mut api, program).unwrap();

        let before = api.calls().len();
        ctx.render_frame(&mut api);
        let frame = &api.calls()[before..];

        assert_eq!(frame[0], Call::Clear(CLEAR_COLOR));
        assert!(matches!(
            &frame[1],
            Call::SetUniformMatrix4 { name, bound: true, .. } if name == UNIFORM_ROTATION
        ));
        assert_eq!(frame[2], Call::DrawTriangles { vertex_count: 3 });
    }

    #[test]
    fn mesh_frame_issues_indexed_draw() {
        let mut api = demo_api();
        let program = linked_program(&mut api);
        let mesh = tiny_mesh();
        let mut ctx = RenderContext::for_mesh(&mut api, program, &mesh).unwrap();

        ctx.render_frame(&mut api);
        assert!(matches!(
            api.calls().last(),
            Some(Call::DrawIndexedTriangles { index_count: 6, .. })
        ));
    }

    #[test]
    fn frame_advances_rotation() {
        let mut api = demo_api();
        let program = linked_program(&mut api);
        let mut ctx = RenderContext::for_triangle(&mut api, program).unwrap();

        assert_eq!(ctx.angle(), 0.0);
        ctx.render_frame(&mut api);
        ctx.render_frame(&mut api);
        assert!((ctx.angle() - 0.02).abs() < 1e-6);
    }

    #[test]
    fn uniform_matrix_changes_between_frames() {
        let mut api = demo_api();
        let program = linked_program(&mut api);
        let mut ctx = RenderContext::for_triangle(&mut api, program).unwrap();

        ctx.render_frame(&mut api);
        ctx.render_frame(&mut api);
        let matrices: Vec<[f32; 16]> = api
            .calls()
            .iter()
            .filter_map(|c| match c {
                Call::SetUniformMatrix4 { matrix, .. } => Some(*matrix),
                _ => None,
            })
            .collect();
        assert_eq!(matrices.len(), 2);
        assert_ne!(matrices[0], matrices[1]);
    }

    #[test]
    fn destroy_releases_everything_buffers_first() {
        let mut api = demo_api();
        let program = linked_program(&mut api);
        let mesh = tiny_mesh();
        let ctx = RenderContext::for_mesh(&mut api, program, &mesh).unwrap();

        ctx.destroy(&mut api);
        assert_eq!(api.live_buffer_count(), 0);
        assert_eq!(api.live_shader_count(), 0);
        assert_eq!(api.live_program_count(), 0);
        assert!(matches!(api.calls().last(), Some(Call::DeleteProgram(_))));
    }

    #[test]
    fn triangle_demo_binds_position_and_color() {
        let mut api = demo_api();
        let program = linked_program(&mut api);
        RenderContext::for_triangle(&mut api, program).unwrap();

        let bound: Vec<&str> = api
            .calls()
            .iter()
            .filter_map(|c| match c {
                Call::BindAttribute { name, bound: true, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(bound, vec![ATTR_POSITION, ATTR_COLOR]);
    }
}
