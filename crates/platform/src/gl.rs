//! Real [`GraphicsApi`] adapter over OpenGL via glow.
//!
//! Owns the glow context and maps the core's numeric handles to native
//! GL objects, so nothing outside this module sees a GL type.

use std::collections::HashMap;

use glow::HasContext;

use corelib::{Error, Mat4, Result, ShaderStage};
use renderer::api::{
    AttribLocation, BufferHandle, GraphicsApi, ProgramHandle, ShaderHandle, UniformLocation,
};

pub struct GlowApi {
    gl: glow::Context,
    // Core profiles refuse to draw without a bound vertex array object.
    vao: glow::VertexArray,
    next_handle: u32,
    shaders: HashMap<u32, glow::Shader>,
    programs: HashMap<u32, glow::Program>,
    buffers: HashMap<u32, glow::Buffer>,
}

impl GlowApi {
    pub fn new(gl: glow::Context) -> Result<Self> {
        let vao = unsafe {
            let vao = gl.create_vertex_array().map_err(Error::Allocation)?;
            gl.bind_vertex_array(Some(vao));
            vao
        };
        Ok(Self {
            gl,
            vao,
            next_handle: 0,
            shaders: HashMap::new(),
            programs: HashMap::new(),
            buffers: HashMap::new(),
        })
    }

    /// Resize the GL viewport after a window resize.
    pub fn viewport(&self, width: u32, height: u32) {
        unsafe {
            self.gl.viewport(0, 0, width.max(1) as i32, height.max(1) as i32);
        }
    }

    fn next(&mut self) -> u32 {
        self.next_handle += 1;
        self.next_handle
    }

    fn native_shader(&self, handle: ShaderHandle) -> Result<glow::Shader> {
        self.shaders.get(&handle.0).copied().ok_or_else(|| {
            Error::format(format!("unknown shader handle {}", handle.0))
        })
    }
}

impl Drop for GlowApi {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_vertex_array(self.vao);
        }
    }
}

fn gl_stage(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

impl GraphicsApi for GlowApi {
    fn compile_shader(&mut self, stage: ShaderStage, source: &str) -> Result<ShaderHandle> {
        unsafe {
            let shader = self.gl.create_shader(gl_stage(stage)).map_err(Error::Allocation)?;
            self.gl.shader_source(shader, source);
            self.gl.compile_shader(shader);
            if !self.gl.get_shader_compile_status(shader) {
                let log = self.gl.get_shader_info_log(shader);
                // Delete before surfacing the error so the failed stage
                // never leaks to the caller.
                self.gl.delete_shader(shader);
                return Err(Error::Compile { stage, log });
            }
            let id = self.next();
            self.shaders.insert(id, shader);
            Ok(ShaderHandle(id))
        }
    }

    fn delete_shader(&mut self, shader: ShaderHandle) {
        if let Some(native) = self.shaders.remove(&shader.0) {
            unsafe { self.gl.delete_shader(native) }
        }
    }

    fn link_program(
        &mut self,
        vertex: ShaderHandle,
        fragment: ShaderHandle,
    ) -> Result<ProgramHandle> {
        let vs = self.native_shader(vertex)?;
        let fs = self.native_shader(fragment)?;
        unsafe {
            let program = self.gl.create_program().map_err(Error::Allocation)?;
            self.gl.attach_shader(program, vs);
            self.gl.attach_shader(program, fs);
            self.gl.link_program(program);
            if !self.gl.get_program_link_status(program) {
                let log = self.gl.get_program_info_log(program);
                self.gl.delete_program(program);
                return Err(Error::Link { log });
            }
            let id = self.next();
            self.programs.insert(id, program);
            Ok(ProgramHandle(id))
        }
    }

    fn use_program(&mut self, program: ProgramHandle) {
        if let Some(&native) = self.programs.get(&program.0) {
            unsafe { self.gl.use_program(Some(native)) }
        }
    }

    fn delete_program(&mut self, program: ProgramHandle) {
        if let Some(native) = self.programs.remove(&program.0) {
            unsafe { self.gl.delete_program(native) }
        }
    }

    fn create_vertex_buffer(&mut self, data: &[[f32; 3]]) -> Result<BufferHandle> {
        unsafe {
            let buffer = self.gl.create_buffer().map_err(Error::Allocation)?;
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            self.gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(data),
                glow::STATIC_DRAW,
            );
            let id = self.next();
            self.buffers.insert(id, buffer);
            Ok(BufferHandle(id))
        }
    }

    fn create_index_buffer(&mut self, data: &[u32]) -> Result<BufferHandle> {
        unsafe {
            let buffer = self.gl.create_buffer().map_err(Error::Allocation)?;
            self.gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(buffer));
            self.gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                bytemuck::cast_slice(data),
                glow::STATIC_DRAW,
            );
            let id = self.next();
            self.buffers.insert(id, buffer);
            Ok(BufferHandle(id))
        }
    }

    fn delete_buffer(&mut self, buffer: BufferHandle) {
        if let Some(native) = self.buffers.remove(&buffer.0) {
            unsafe { self.gl.delete_buffer(native) }
        }
    }

    fn bind_attribute(
        &mut self,
        program: ProgramHandle,
        buffer: BufferHandle,
        name: &str,
    ) -> Option<AttribLocation> {
        let native_program = *self.programs.get(&program.0)?;
        let native_buffer = *self.buffers.get(&buffer.0)?;
        unsafe {
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(native_buffer));
            let location = self.gl.get_attrib_location(native_program, name)?;
            self.gl.enable_vertex_attrib_array(location);
            // Tightly packed, 3 floats per vertex, no stride.
            self.gl
                .vertex_attrib_pointer_f32(location, 3, glow::FLOAT, false, 0, 0);
            Some(AttribLocation(location))
        }
    }

    fn set_uniform_matrix4(
        &mut self,
        program: ProgramHandle,
        name: &str,
        matrix: &Mat4,
    ) -> Option<UniformLocation> {
        let native_program = *self.programs.get(&program.0)?;
        unsafe {
            let location = self.gl.get_uniform_location(native_program, name)?;
            // Column-major upload, no transpose, same as the demo shaders
            // expect.
            self.gl
                .uniform_matrix_4_f32_slice(Some(&location), false, &matrix.to_cols_array());
            Some(UniformLocation(location.0))
        }
    }

    fn clear(&mut self, rgba: [f32; 4]) {
        unsafe {
            self.gl.clear_color(rgba[0], rgba[1], rgba[2], rgba[3]);
            self.gl.clear(glow::COLOR_BUFFER_BIT);
        }
    }

    fn draw_triangles(&mut self, vertex_count: u32) {
        unsafe {
            self.gl.draw_arrays(glow::TRIANGLES, 0, vertex_count as i32);
        }
    }

    fn draw_indexed_triangles(&mut self, indices: BufferHandle, index_count: u32) {
        if let Some(&native) = self.buffers.get(&indices.0) {
            unsafe {
                self.gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(native));
                self.gl
                    .draw_elements(glow::TRIANGLES, index_count as i32, glow::UNSIGNED_INT, 0);
            }
        }
    }
}
