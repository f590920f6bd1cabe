//! CPU-side mesh representation used by loaders.

/// Indexed triangle mesh: flat positions plus triangle indices.
/// Positions are in object space, indices reference `positions` entries.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new(positions: Vec<[f32; 3]>, indices: Vec<u32>) -> Self {
        Self { positions, indices }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Returns `true` if both position and index buffers are non-empty.
    pub fn is_valid(&self) -> bool {
        !self.positions.is_empty() && !self.indices.is_empty()
    }

    /// Returns `true` if every index references an existing vertex.
    /// The trusting loader does not call this; callers that want the
    /// check pay for it explicitly.
    pub fn indices_in_range(&self) -> bool {
        let n = self.positions.len() as u32;
        self.indices.iter().all(|&i| i < n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mesh_data_validity() {
        let data = MeshData::new(vec![[0.0; 3]; 3], vec![0, 1, 2]);
        assert!(data.is_valid());
        assert_eq!(data.vertex_count(), 3);
        assert_eq!(data.triangle_count(), 1);
    }

    #[test]
    fn out_of_range_index_detected() {
        let data = MeshData::new(vec![[0.0; 3]; 3], vec![0, 1, 3]);
        assert!(!data.indices_in_range());
    }
}
