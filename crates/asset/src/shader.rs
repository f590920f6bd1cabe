//! Shader source reading with a grow-on-demand buffer.
//!
//! Source length is unbounded and unknown up front, so the reader starts
//! with a small buffer and doubles it whenever a read fills it. Growth is
//! fallible and surfaces as [`Error::Allocation`] rather than aborting.

use std::{fs::File, io::Read, path::Path};

use corelib::{Error, Result};

/// Starting buffer size for a source read.
pub const INITIAL_CAPACITY: usize = 1024;

/// Read the entire file at `path` as shader source text.
pub fn load_shader_source(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    log::debug!("Reading shader source from {}", path.display());
    let file = File::open(path)?;
    read_source(file)
}

/// Read a source text of unknown length to EOF, doubling the buffer on
/// exhaustion, and validate it as UTF-8.
pub fn read_source<R: Read>(mut reader: R) -> Result<String> {
    let mut buf = alloc_zeroed(INITIAL_CAPACITY)?;
    let mut used = 0;

    loop {
        if used == buf.len() {
            grow_double(&mut buf)?;
        }
        let read = reader.read(&mut buf[used..])?;
        if read == 0 {
            break;
        }
        used += read;
    }

    buf.truncate(used);
    String::from_utf8(buf)
        .map_err(|e| Error::format(format!("shader source is not valid UTF-8: {e}")))
}

fn alloc_zeroed(len: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|e| Error::Allocation(e.to_string()))?;
    buf.resize(len, 0);
    Ok(buf)
}

fn grow_double(buf: &mut Vec<u8>) -> Result<()> {
    let len = buf.len();
    buf.try_reserve_exact(len)
        .map_err(|e| Error::Allocation(e.to_string()))?;
    buf.resize(len * 2, 0);
    Ok(())
}
