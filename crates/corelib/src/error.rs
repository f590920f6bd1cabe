//! Error taxonomy shared by the loaders and the renderer.
//!
//! Every fallible core operation returns [`Result`]; nothing here retries
//! or recovers. The startup sequence surfaces the error and exits before
//! the event loop runs.

use thiserror::Error;

use crate::ShaderStage;

#[derive(Debug, Error)]
pub enum Error {
    /// File missing, unreadable, or a read failed mid-stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input did not match the expected text layout (missing header
    /// sentinel, malformed numeric field, truncated record block).
    #[error("format error: {0}")]
    Format(String),

    /// A shader stage failed to compile; carries the compiler log.
    #[error("{stage} shader failed to compile: {log}")]
    Compile { stage: ShaderStage, log: String },

    /// Program linking failed; carries the linker log.
    #[error("shader program failed to link: {log}")]
    Link { log: String },

    /// Growing a dynamic read buffer failed.
    #[error("allocation failed: {0}")]
    Allocation(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for a [`Error::Format`] with a formatted message.
    pub fn format(msg: impl Into<String>) -> Self {
        Error::Format(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_converts() {
        fn open_missing() -> Result<std::fs::File> {
            Ok(std::fs::File::open("/definitely/not/here")?)
        }
        assert!(matches!(open_missing(), Err(Error::Io(_))));
    }

    #[test]
    fn link_error_display_includes_log() {
        let err = Error::Link {
            log: "undefined reference to main".into(),
        };
        assert!(err.to_string().contains("undefined reference"));
    }
}
