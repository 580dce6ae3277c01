use crate::model::{BlockMesh, Quad};

/// Flattened vertex/index buffers for one chunk bucket, ready for upload.
#[derive(Default, Clone, Debug, PartialEq)]
pub struct MeshBuild {
    pub pos: Vec<f32>,
    pub norm: Vec<f32>,
    pub uv: Vec<f32>,
    pub col: Vec<u8>,
    pub block_pos: Vec<i32>,
    pub emission: Vec<f32>,
    pub idx: Vec<u32>,
}

impl MeshBuild {
    /// Clears all arrays but retains capacity for reuse across rebuilds.
    #[inline]
    pub fn clear_keep_capacity(&mut self) {
        self.pos.clear();
        self.norm.clear();
        self.uv.clear();
        self.col.clear();
        self.block_pos.clear();
        self.emission.clear();
        self.idx.clear();
    }

    /// Pre-reserve capacity for approximately `n_quads` quads worth of data.
    #[inline]
    pub fn reserve_quads(&mut self, n_quads: usize) {
        // 4 vertices per quad
        self.pos.reserve(n_quads * 4 * 3);
        self.norm.reserve(n_quads * 4 * 3);
        self.uv.reserve(n_quads * 4 * 2);
        self.col.reserve(n_quads * 4 * 4);
        self.block_pos.reserve(n_quads * 4 * 3);
        self.emission.reserve(n_quads * 4);
        self.idx.reserve(n_quads * 6);
    }

    /// Appends a quad as two triangles `(0,1,2)` and `(0,2,3)`.
    pub fn add_quad(&mut self, q: &Quad) {
        let base = self.vertex_count() as u32;
        for v in &q.vertices {
            self.pos.extend_from_slice(&[v.pos.x, v.pos.y, v.pos.z]);
            self.norm
                .extend_from_slice(&[v.normal.x, v.normal.y, v.normal.z]);
            self.uv.extend_from_slice(&v.uv);
            self.col.extend_from_slice(&v.color);
            self.block_pos
                .extend_from_slice(&[v.block_pos.x, v.block_pos.y, v.block_pos.z]);
            self.emission.push(v.emission);
        }
        self.idx
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    pub fn add_mesh(&mut self, mesh: &BlockMesh) {
        self.reserve_quads(mesh.quads.len());
        for q in &mesh.quads {
            self.add_quad(q);
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.pos.len() / 3
    }

    #[inline]
    pub fn quad_count(&self) -> usize {
        self.idx.len() / 6
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.idx.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Vertex;
    use cubist_geom::Vec3;

    fn quad() -> Quad {
        let v = |x: f32, y: f32| Vertex::new(Vec3::new(x, y, 0.0), [x, y], [255; 4]);
        Quad::new([v(0., 0.), v(1., 0.), v(1., 1.), v(0., 1.)])
    }

    #[test]
    fn quads_become_two_triangles() {
        let mut mb = MeshBuild::default();
        mb.add_quad(&quad());
        mb.add_quad(&quad());
        assert_eq!(mb.quad_count(), 2);
        assert_eq!(mb.vertex_count(), 8);
        assert_eq!(&mb.idx[6..], &[4u32, 5, 6, 4, 6, 7]);
        assert_eq!(mb.col.len(), 32);
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut mb = MeshBuild::default();
        mb.add_mesh(&BlockMesh { quads: vec![quad(); 3] });
        let cap = mb.pos.capacity();
        mb.clear_keep_capacity();
        assert!(mb.is_empty());
        assert_eq!(mb.pos.capacity(), cap);
    }
}
