//! CPU-side mesh representation used by loaders.

/// Indexed triangle mesh as parallel flat arrays.
///
/// `positions` holds 3 floats per vertex. `normals` (3 per vertex) and `uvs`
/// (2 per vertex) are either empty, meaning the attribute is absent, or cover
/// every vertex. `indices` holds 3 zero-based vertex indices per triangle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    pub uvs: Vec<f32>,
    pub indices: Vec<u32>,
}

impl Mesh {
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[inline]
    pub fn has_normals(&self) -> bool {
        !self.normals.is_empty()
    }

    #[inline]
    pub fn has_uvs(&self) -> bool {
        !self.uvs.is_empty()
    }

    pub fn position(&self, vertex: usize) -> Option<[f32; 3]> {
        let p = self.positions.get(vertex * 3..vertex * 3 + 3)?;
        Some([p[0], p[1], p[2]])
    }

    /// Checks array shapes and that every index references a vertex.
    pub fn is_valid(&self) -> bool {
        self.check().is_ok()
    }

    /// Like [`Mesh::is_valid`], naming the first broken rule.
    pub fn check(&self) -> Result<(), &'static str> {
        let count = self.vertex_count();
        if self.positions.len() % 3 != 0 {
            return Err("positions are not xyz triples");
        }
        if self.indices.len() % 3 != 0 {
            return Err("indices are not whole triangles");
        }
        if !self.normals.is_empty() && self.normals.len() != count * 3 {
            return Err("normals do not cover every vertex");
        }
        if !self.uvs.is_empty() && self.uvs.len() != count * 2 {
            return Err("uvs do not cover every vertex");
        }
        if self.indices.iter().any(|&i| i as usize >= count) {
            return Err("index out of range");
        }
        Ok(())
    }
}
