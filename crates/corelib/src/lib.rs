//! Core shared types: math re-exports, error taxonomy, rotation state.

pub use glam::{Mat4, Vec3, vec3};

pub mod error;
pub mod spin;

pub use error::{Error, Result};

/// Shader stage tag, carried by handles and compile errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl std::fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}
