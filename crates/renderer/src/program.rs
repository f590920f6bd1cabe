//! Shader program lifecycle: compile two stages, link, bind by name.

use std::path::Path;

use corelib::{Mat4, Result, ShaderStage};

use crate::api::{
    AttribLocation, BufferHandle, GraphicsApi, ProgramHandle, ShaderHandle, UniformLocation,
};

/// A compiled shader stage, owned by the caller until it is attached to a
/// program (or deleted on an error path).
#[derive(Debug)]
pub struct CompiledShader {
    handle: ShaderHandle,
    stage: ShaderStage,
}

impl CompiledShader {
    /// Compile in-memory source as the given stage.
    pub fn from_source<A: GraphicsApi>(
        api: &mut A,
        stage: ShaderStage,
        source: &str,
    ) -> Result<Self> {
        let handle = api.compile_shader(stage, source)?;
        Ok(Self { handle, stage })
    }

    /// Read the file at `path` (grow-on-demand, any length) and compile it.
    pub fn from_file<A: GraphicsApi>(
        api: &mut A,
        path: impl AsRef<Path>,
        stage: ShaderStage,
    ) -> Result<Self> {
        let source = asset::shader::load_shader_source(path)?;
        Self::from_source(api, stage, &source)
    }

    pub fn handle(&self) -> ShaderHandle {
        self.handle
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }
}

/// A linked shader program, active from link time until [`destroy`].
///
/// Holds on to its two stage handles so they can be deleted after the
/// program, never before it.
///
/// [`destroy`]: ShaderProgram::destroy
#[derive(Debug)]
pub struct ShaderProgram {
    program: ProgramHandle,
    vertex: ShaderHandle,
    fragment: ShaderHandle,
}

impl ShaderProgram {
    /// Link both stages into a program and make it current.
    ///
    /// On link failure the stages are deleted here; nothing leaks.
    pub fn link<A: GraphicsApi>(
        api: &mut A,
        vertex: CompiledShader,
        fragment: CompiledShader,
    ) -> Result<Self> {
        match api.link_program(vertex.handle, fragment.handle) {
            Ok(program) => {
                api.use_program(program);
                Ok(Self {
                    program,
                    vertex: vertex.handle,
                    fragment: fragment.handle,
                })
            }
            Err(err) => {
                api.delete_shader(vertex.handle);
                api.delete_shader(fragment.handle);
                Err(err)
            }
        }
    }

    /// Load, compile and link a vertex/fragment source pair from disk.
    pub fn from_files<A: GraphicsApi>(
        api: &mut A,
        vert_path: impl AsRef<Path>,
        frag_path: impl AsRef<Path>,
    ) -> Result<Self> {
        let vertex = CompiledShader::from_file(api, vert_path, ShaderStage::Vertex)?;
        let fragment = match CompiledShader::from_file(api, frag_path, ShaderStage::Fragment) {
            Ok(fragment) => fragment,
            Err(err) => {
                api.delete_shader(vertex.handle);
                return Err(err);
            }
        };
        Self::link(api, vertex, fragment)
    }

    pub fn handle(&self) -> ProgramHandle {
        self.program
    }

    /// Bind a vertex buffer to the named program input.
    /// `None` means the name is not an active attribute.
    pub fn bind_attribute<A: GraphicsApi>(
        &self,
        api: &mut A,
        buffer: BufferHandle,
        name: &str,
    ) -> Option<AttribLocation> {
        api.bind_attribute(self.program, buffer, name)
    }

    /// Upload a column-major 4x4 matrix to the named uniform.
    /// `None` means the name is not an active uniform.
    pub fn set_uniform_matrix4<A: GraphicsApi>(
        &self,
        api: &mut A,
        name: &str,
        matrix: &Mat4,
    ) -> Option<UniformLocation> {
        api.set_uniform_matrix4(self.program, name, matrix)
    }

    /// Delete the stages, then the program. Consuming `self` makes a
    /// second destroy unrepresentable.
    pub fn destroy<A: GraphicsApi>(self, api: &mut A) {
        api.delete_shader(self.vertex);
        api.delete_shader(self.fragment);
        api.delete_program(self.program);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{Call, RecordingApi};
    use corelib::Error;

    const VERT_SRC: &str = "#version 330 core\nin vec3 position;\nvoid main() {}\n";
    const FRAG_SRC: &str = "#version 330 core\nout vec4 fragment;\nvoid main() {}\n";

    fn linked_program(api: &mut RecordingApi) -> ShaderProgram {
        let vertex =
            CompiledShader::from_source(api, ShaderStage::Vertex, VERT_SRC).expect("compile vs");
        let fragment = CompiledShader::from_source(api, ShaderStage::Fragment, FRAG_SRC)
            .expect("compile fs");
        ShaderProgram::link(api, vertex, fragment).expect("link")
    }

    #[test]
    fn link_activates_program() {
        let mut api = RecordingApi::new();
        let program = linked_program(&mut api);
        assert!(
            api.calls()
                .contains(&Call::UseProgram(program.handle()))
        );
    }

    #[test]
    fn actual_attribute_name_binds() {
        let mut api = RecordingApi::new().with_attribute("position");
        let program = linked_program(&mut api);
        let buffer = api.create_vertex_buffer(&[[0.0; 3]; 3]).expect("buffer");
        assert!(program.bind_attribute(&mut api, buffer, "position").is_some());
    }

    #[test]
    fn unknown_attribute_name_is_none() {
        let mut api = RecordingApi::new().with_attribute("position");
        let program = linked_program(&mut api);
        let buffer = api.create_vertex_buffer(&[[0.0; 3]; 3]).expect("buffer");
        assert!(program.bind_attribute(&mut api, buffer, "normal").is_none());
    }

    #[test]
    fn actual_uniform_name_binds() {
        let mut api = RecordingApi::new().with_uniform("rotationMatrix");
        let program = linked_program(&mut api);
        let loc = program.set_uniform_matrix4(&mut api, "rotationMatrix", &Mat4::IDENTITY);
        assert!(loc.is_some());
        assert!(
            program
                .set_uniform_matrix4(&mut api, "unusedMatrix", &Mat4::IDENTITY)
                .is_none()
        );
    }

    #[test]
    fn compile_failure_leaks_no_shader_handle() {
        let mut api = RecordingApi::new().fail_next_compile("0:2: syntax error");
        let err = CompiledShader::from_source(&mut api, ShaderStage::Vertex, "garbage")
            .unwrap_err();
        match err {
            Error::Compile { stage, log } => {
                assert_eq!(stage, ShaderStage::Vertex);
                assert!(log.contains("syntax error"));
            }
            other => panic!("expected compile error, got {other:?}"),
        }
        assert_eq!(api.live_shader_count(), 0);
    }

    #[test]
    fn link_failure_cleans_up_both_stages() {
        let mut api = RecordingApi::new().fail_next_link("attribute mismatch");
        let vertex = CompiledShader::from_source(&mut api, ShaderStage::Vertex, VERT_SRC)
            .expect("compile vs");
        let fragment = CompiledShader::from_source(&mut api, ShaderStage::Fragment, FRAG_SRC)
            .expect("compile fs");
        let err = ShaderProgram::link(&mut api, vertex, fragment).unwrap_err();
        assert!(matches!(err, Error::Link { .. }));
        assert_eq!(api.live_shader_count(), 0);
        assert_eq!(api.live_program_count(), 0);
    }

    #[test]
    fn missing_source_file_is_io_error() {
        let mut api = RecordingApi::new();
        let err = ShaderProgram::from_files(&mut api, "/no/such/main.vert", "/no/such/main.frag")
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert_eq!(api.live_shader_count(), 0);
    }

    #[test]
    fn destroy_deletes_stages_before_program() {
        let mut api = RecordingApi::new();
        let program = linked_program(&mut api);
        let handle = program.handle();
        program.destroy(&mut api);
        assert_eq!(api.live_shader_count(), 0);
        assert_eq!(api.live_program_count(), 0);
        let tail: Vec<_> = api.calls().iter().rev().take(3).cloned().collect();
        assert_eq!(tail[0], Call::DeleteProgram(handle));
        assert!(matches!(tail[1], Call::DeleteShader(_)));
        assert!(matches!(tail[2], Call::DeleteShader(_)));
    }
}
