use std::sync::Arc;

use cubist_blocks::BlockState;
use cubist_geom::BlockPos;
use cubist_structure::{PlacedBlock, VoxelStructure};

/// Read access to the blocks being meshed.
pub trait BlockSource {
    /// Every block, in the order they should be processed.
    fn blocks(&self) -> &[PlacedBlock];

    fn block(&self, pos: BlockPos) -> Option<PlacedBlock>;

    fn palette_len(&self) -> usize;

    /// State stored at palette `index`; lets per-state caches detect reassigned slots.
    fn palette_state(&self, index: u32) -> Option<Arc<BlockState>>;

    /// Palette index at `pos` without resolving the state.
    fn palette_index_at(&self, pos: BlockPos) -> Option<u32> {
        self.block(pos).map(|b| b.palette_index)
    }
}

impl BlockSource for VoxelStructure {
    fn blocks(&self) -> &[PlacedBlock] {
        VoxelStructure::blocks(self)
    }

    fn block(&self, pos: BlockPos) -> Option<PlacedBlock> {
        VoxelStructure::block(self, pos)
    }

    fn palette_len(&self) -> usize {
        self.palette().len()
    }

    fn palette_state(&self, index: u32) -> Option<Arc<BlockState>> {
        self.palette().get(index).cloned()
    }

    fn palette_index_at(&self, pos: BlockPos) -> Option<u32> {
        self.state_index(pos)
    }
}
