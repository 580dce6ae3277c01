use std::sync::Arc;

use cubist_geom::{BlockPos, Vec3};

use crate::mesh_build::MeshBuild;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cy: i32,
    pub cz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cy: i32, cz: i32) -> Self {
        Self { cx, cy, cz }
    }

    /// Chunk owning the block at `pos`.
    #[inline]
    pub fn of(pos: BlockPos, chunk_size: i32) -> Self {
        let c = pos.div_floor(chunk_size);
        Self::new(c.x, c.y, c.z)
    }

    /// World-space minimum corner.
    #[inline]
    pub fn origin(self, chunk_size: i32) -> Vec3 {
        let s = chunk_size as f32;
        Vec3::new(self.cx as f32 * s, self.cy as f32 * s, self.cz as f32 * s)
    }

    #[inline]
    pub fn center(self, chunk_size: i32) -> Vec3 {
        self.origin(chunk_size) + Vec3::splat(chunk_size as f32 * 0.5)
    }
}

impl From<(i32, i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32, i32)) -> Self {
        Self::new(value.0, value.1, value.2)
    }
}

const AXIS_BITS: u32 = 33;
const AXIS_MASK: u128 = (1 << AXIS_BITS) - 1;

#[inline]
fn zigzag(c: i32) -> u64 {
    2 * u64::from(c.unsigned_abs()) + u64::from(c < 0)
}

#[inline]
fn unzigzag(z: u64) -> i32 {
    let mag = (z / 2) as i64;
    if z & 1 == 1 { -mag as i32 } else { mag as i32 }
}

/// Sparse-map key for a chunk: each axis zigzag-encoded (`2|c| + (c<0)`) and packed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkKey(u128);

impl ChunkKey {
    pub fn new(coord: ChunkCoord) -> Self {
        let x = u128::from(zigzag(coord.cx));
        let y = u128::from(zigzag(coord.cy));
        let z = u128::from(zigzag(coord.cz));
        ChunkKey((x << (2 * AXIS_BITS)) | (y << AXIS_BITS) | z)
    }

    pub fn coord(self) -> ChunkCoord {
        let x = ((self.0 >> (2 * AXIS_BITS)) & AXIS_MASK) as u64;
        let y = ((self.0 >> AXIS_BITS) & AXIS_MASK) as u64;
        let z = (self.0 & AXIS_MASK) as u64;
        ChunkCoord::new(unzigzag(x), unzigzag(y), unzigzag(z))
    }
}

impl From<ChunkCoord> for ChunkKey {
    fn from(c: ChunkCoord) -> Self {
        ChunkKey::new(c)
    }
}

/// Finalized buffers of one chunk. Readers only ever see these.
#[derive(Clone, Debug)]
pub struct Chunk {
    pub coord: ChunkCoord,
    pub origin: Vec3,
    pub opaque: Arc<MeshBuild>,
    pub transparent: Arc<MeshBuild>,
    /// Bumped on every finalize so renderers know to re-upload.
    pub rev: u64,
}

impl Chunk {
    pub(crate) fn new(coord: ChunkCoord, chunk_size: i32) -> Self {
        Self {
            coord,
            origin: coord.origin(chunk_size),
            opaque: Arc::default(),
            transparent: Arc::default(),
            rev: 0,
        }
    }

    pub(crate) fn finalize(&mut self, opaque: MeshBuild, transparent: MeshBuild) {
        self.opaque = Arc::new(opaque);
        self.transparent = Arc::new(transparent);
        self.rev = self.rev.wrapping_add(1);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.opaque.is_empty() && self.transparent.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zigzag_matches_formula() {
        assert_eq!(zigzag(0), 0);
        assert_eq!(zigzag(1), 2);
        assert_eq!(zigzag(-1), 3);
        assert_eq!(zigzag(-5), 11);
        assert_eq!(unzigzag(zigzag(i32::MIN)), i32::MIN);
        assert_eq!(unzigzag(zigzag(i32::MAX)), i32::MAX);
    }

    #[test]
    fn chunk_of_negative_positions() {
        assert_eq!(ChunkCoord::of(BlockPos::new(-1, 0, 15), 16), ChunkCoord::new(-1, 0, 0));
        assert_eq!(ChunkCoord::of(BlockPos::new(16, -16, -17), 16), ChunkCoord::new(1, -1, -2));
        assert_eq!(ChunkCoord::new(1, -1, 0).center(16), Vec3::new(24.0, -8.0, 8.0));
    }
}
