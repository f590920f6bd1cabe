//! Call-recording [`GraphicsApi`] adapter.
//!
//! Stands in for a real GPU context in tests: every call is appended to a
//! log, active attribute/uniform names are configurable, and the next
//! compile or link can be made to fail with a given info log. Live handle
//! counters let tests assert that error paths leak nothing.

use std::collections::HashSet;

use corelib::{Error, Mat4, Result, ShaderStage};

use crate::api::{
    AttribLocation, BufferHandle, GraphicsApi, ProgramHandle, ShaderHandle, UniformLocation,
};

/// One recorded capability call.
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    CompileShader { stage: ShaderStage },
    DeleteShader(ShaderHandle),
    LinkProgram { vertex: ShaderHandle, fragment: ShaderHandle },
    UseProgram(ProgramHandle),
    DeleteProgram(ProgramHandle),
    CreateVertexBuffer { vertices: usize },
    CreateIndexBuffer { indices: usize },
    DeleteBuffer(BufferHandle),
    BindAttribute { program: ProgramHandle, buffer: BufferHandle, name: String, bound: bool },
    SetUniformMatrix4 { program: ProgramHandle, name: String, matrix: [f32; 16], bound: bool },
    Clear([f32; 4]),
    DrawTriangles { vertex_count: u32 },
    DrawIndexedTriangles { indices: BufferHandle, index_count: u32 },
}

#[derive(Debug, Default)]
pub struct RecordingApi {
    calls: Vec<Call>,
    next_handle: u32,
    attributes: Vec<String>,
    uniforms: Vec<String>,
    fail_compile: Option<String>,
    fail_link: Option<String>,
    live_shaders: HashSet<u32>,
    live_programs: HashSet<u32>,
    live_buffers: HashSet<u32>,
}

impl RecordingApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `name` as an active vertex attribute.
    pub fn with_attribute(mut self, name: &str) -> Self {
        self.attributes.push(name.to_owned());
        self
    }

    /// Declare `name` as an active uniform.
    pub fn with_uniform(mut self, name: &str) -> Self {
        self.uniforms.push(name.to_owned());
        self
    }

    /// Make the next [`GraphicsApi::compile_shader`] fail with `log`.
    pub fn fail_next_compile(mut self, log: &str) -> Self {
        self.fail_compile = Some(log.to_owned());
        self
    }

    /// Make the next [`GraphicsApi::link_program`] fail with `log`.
    pub fn fail_next_link(mut self, log: &str) -> Self {
        self.fail_link = Some(log.to_owned());
        self
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub fn live_shader_count(&self) -> usize {
        self.live_shaders.len()
    }

    pub fn live_program_count(&self) -> usize {
        self.live_programs.len()
    }

    pub fn live_buffer_count(&self) -> usize {
        self.live_buffers.len()
    }

    fn next(&mut self) -> u32 {
        self.next_handle += 1;
        self.next_handle
    }
}

impl GraphicsApi for RecordingApi {
    fn compile_shader(&mut self, stage: ShaderStage, _source: &str) -> Result<ShaderHandle> {
        self.calls.push(Call::CompileShader { stage });
        let id = self.next();
        if let Some(log) = self.fail_compile.take() {
            // Mirror the real adapter: the failed stage object is deleted
            // before the error is returned.
            self.calls.push(Call::DeleteShader(ShaderHandle(id)));
            return Err(Error::Compile { stage, log });
        }
        self.live_shaders.insert(id);
        Ok(ShaderHandle(id))
    }

    fn delete_shader(&mut self, shader: ShaderHandle) {
        self.live_shaders.remove(&shader.0);
        self.calls.push(Call::DeleteShader(shader));
    }

    fn link_program(
        &mut self,
        vertex: ShaderHandle,
        fragment: ShaderHandle,
    ) -> Result<ProgramHandle> {
        self.calls.push(Call::LinkProgram { vertex, fragment });
        let id = self.next();
        if let Some(log) = self.fail_link.take() {
            self.calls.push(Call::DeleteProgram(ProgramHandle(id)));
            return Err(Error::Link { log });
        }
        self.live_programs.insert(id);
        Ok(ProgramHandle(id))
    }

    fn use_program(&mut self, program: ProgramHandle) {
        self.calls.push(Call::UseProgram(program));
    }

    fn delete_program(&mut self, program: ProgramHandle) {
        self.live_programs.remove(&program.0);
        self.calls.push(Call::DeleteProgram(program));
    }

    fn create_vertex_buffer(&mut self, data: &[[f32; 3]]) -> Result<BufferHandle> {
        self.calls.push(Call::CreateVertexBuffer { vertices: data.len() });
        let id = self.next();
        self.live_buffers.insert(id);
        Ok(BufferHandle(id))
    }

    fn create_index_buffer(&mut self, data: &[u32]) -> Result<BufferHandle> {
        self.calls.push(Call::CreateIndexBuffer { indices: data.len() });
        let id = self.next();
        self.live_buffers.insert(id);
        Ok(BufferHandle(id))
    }

    fn delete_buffer(&mut self, buffer: BufferHandle) {
        self.live_buffers.remove(&buffer.0);
        self.calls.push(Call::DeleteBuffer(buffer));
    }

    fn bind_attribute(
        &mut self,
        program: ProgramHandle,
        buffer: BufferHandle,
        name: &str,
    ) -> Option<AttribLocation> {
        let location = self
            .attributes
            .iter()
            .position(|n| n == name)
            .map(|i| AttribLocation(i as u32));
        self.calls.push(Call::BindAttribute {
            program,
            buffer,
            name: name.to_owned(),
            bound: location.is_some(),
        });
        location
    }

    fn set_uniform_matrix4(
        &mut self,
        program: ProgramHandle,
        name: &str,
        matrix: &Mat4,
    ) -> Option<UniformLocation> {
        let location = self
            .uniforms
            .iter()
            .position(|n| n == name)
            .map(|i| UniformLocation(i as u32));
        self.calls.push(Call::SetUniformMatrix4 {
            program,
            name: name.to_owned(),
            matrix: matrix.to_cols_array(),
            bound: location.is_some(),
        });
        location
    }

    fn clear(&mut self, rgba: [f32; 4]) {
        self.calls.push(Call::Clear(rgba));
    }

    fn draw_triangles(&mut self, vertex_count: u32) {
        self.calls.push(Call::DrawTriangles { vertex_count });
    }

    fn draw_indexed_triangles(&mut self, indices: BufferHandle, index_count: u32) {
        self.calls.push(Call::DrawIndexedTriangles { indices, index_count });
    }
}
