use cubist_geom::{BlockPos, Vec3};

/// Point light recorded for an emissive block, placed at the block center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EmissiveLight {
    pub pos: Vec3,
    pub block: BlockPos,
    pub intensity: f32,
    pub color: [f32; 3],
}

impl EmissiveLight {
    pub fn at(block: BlockPos, intensity: f32, color: [f32; 3]) -> Self {
        Self {
            pos: block.center(),
            block,
            intensity,
            color,
        }
    }
}
