//! Narrow capability interface over the host graphics system.
//!
//! The core only ever calls these operations; it never implements them.
//! The real adapter lives in the platform crate, the recording adapter in
//! [`crate::recording`].

use corelib::{Mat4, Result, ShaderStage};

/// Opaque handle to a compiled shader stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ShaderHandle(pub u32);

/// Opaque handle to a linked shader program.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ProgramHandle(pub u32);

/// Opaque handle to a GPU-resident vertex or index buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BufferHandle(pub u32);

/// Location of an active vertex attribute within a program.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AttribLocation(pub u32);

/// Location of an active uniform within a program.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub u32);

/// The operations the viewer core needs from a graphics backend.
pub trait GraphicsApi {
    /// Compile `source` as the given stage.
    ///
    /// On failure the implementation must delete the native shader object
    /// before returning [`corelib::Error::Compile`], so no half-built
    /// stage handle leaks to the caller.
    fn compile_shader(&mut self, stage: ShaderStage, source: &str) -> Result<ShaderHandle>;

    fn delete_shader(&mut self, shader: ShaderHandle);

    /// Attach both stages to a fresh program object and link it.
    ///
    /// On failure the implementation deletes the program object it
    /// created and returns [`corelib::Error::Link`]; the stage handles
    /// stay alive and remain the caller's to clean up.
    fn link_program(&mut self, vertex: ShaderHandle, fragment: ShaderHandle)
    -> Result<ProgramHandle>;

    fn use_program(&mut self, program: ProgramHandle);

    fn delete_program(&mut self, program: ProgramHandle);

    /// Upload tightly-packed vertex data (3 floats per vertex, no stride).
    fn create_vertex_buffer(&mut self, data: &[[f32; 3]]) -> Result<BufferHandle>;

    /// Upload triangle indices for indexed drawing.
    fn create_index_buffer(&mut self, data: &[u32]) -> Result<BufferHandle>;

    fn delete_buffer(&mut self, buffer: BufferHandle);

    /// Bind `buffer` to the named per-vertex input of `program`.
    ///
    /// Returns `None` when `name` is not an active attribute; an unused
    /// name is not an error here, the caller decides what it means.
    fn bind_attribute(
        &mut self,
        program: ProgramHandle,
        buffer: BufferHandle,
        name: &str,
    ) -> Option<AttribLocation>;

    /// Upload a column-major 4x4 matrix to the named uniform.
    ///
    /// Same optional-binding contract as [`Self::bind_attribute`].
    fn set_uniform_matrix4(
        &mut self,
        program: ProgramHandle,
        name: &str,
        matrix: &Mat4,
    ) -> Option<UniformLocation>;

    /// Fill the color buffer with `rgba`.
    fn clear(&mut self, rgba: [f32; 4]);

    /// Non-indexed triangle-list draw over the bound attributes.
    fn draw_triangles(&mut self, vertex_count: u32);

    /// Indexed triangle-list draw using `indices`.
    fn draw_indexed_triangles(&mut self, indices: BufferHandle, index_count: u32);
}
