//! Asset loading/parsers (meshes, shader sources).
//! Fixed-format PLY mesh reader producing CPU-friendly mesh data, plus the
//! grow-on-demand shader source reader.

pub mod mesh;
pub mod ply;
pub mod shader;
