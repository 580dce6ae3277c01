use cubist_geom::BlockPos;

#[derive(Debug, thiserror::Error)]
pub enum StructureError {
    #[error("position {pos} is outside structure bounds {size}")]
    InvalidPosition { pos: BlockPos, size: BlockPos },
    #[error("block at {pos} uses palette index {index}, palette has {len} entries")]
    InvalidPaletteIndex {
        pos: BlockPos,
        index: u32,
        len: usize,
    },
    #[error("structure json: {0}")]
    Json(#[from] serde_json::Error),
}
