//! Renderer core: graphics capability trait, shader program builder and
//! render context. Adapters implement [`api::GraphicsApi`]; everything
//! else in this crate goes through that trait and never touches the GPU,
//! so the whole pipeline is testable with the recording adapter.

pub mod api;
pub mod context;
pub mod program;
pub mod recording;

pub use api::GraphicsApi;
pub use context::RenderContext;
pub use program::{CompiledShader, ShaderProgram};
