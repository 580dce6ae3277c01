use std::cell::OnceCell;
use std::sync::Arc;

use cubist_blocks::{BlockState, Properties};
use cubist_geom::BlockPos;

use crate::error::StructureError;
use crate::palette::Palette;

/// Opaque per-block payload (block-entity data). Only special-case renderers look inside.
pub type Payload = serde_json::Value;

/// Raw stored entry: position, palette index and optional payload.
#[derive(Clone, Debug, PartialEq)]
pub struct StoredBlock {
    pub pos: BlockPos,
    pub state: u32,
    pub nbt: Option<Arc<Payload>>,
}

/// Resolved view of a stored block with its palette state looked up.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedBlock {
    pub pos: BlockPos,
    pub state: Arc<BlockState>,
    pub nbt: Option<Arc<Payload>>,
    pub palette_index: u32,
}

/// Dense block store over a fixed `[0, size)` bound.
#[derive(Debug)]
pub struct VoxelStructure {
    size: BlockPos,
    palette: Palette,
    // Insertion order.
    stored: Vec<StoredBlock>,
    // Linear offset -> slot in `stored`.
    cells: Vec<Option<u32>>,
    placed: OnceCell<Vec<PlacedBlock>>,
}

impl VoxelStructure {
    /// Empty structure; negative axes are treated as zero-length.
    pub fn new(size: impl Into<BlockPos>) -> Self {
        let s = size.into();
        let size = BlockPos::new(s.x.max(0), s.y.max(0), s.z.max(0));
        let volume = size.x as usize * size.y as usize * size.z as usize;
        Self {
            size,
            palette: Palette::new(),
            stored: Vec::new(),
            cells: vec![None; volume],
            placed: OnceCell::new(),
        }
    }

    #[inline]
    pub fn size(&self) -> BlockPos {
        self.size
    }

    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Number of occupied positions.
    #[inline]
    pub fn len(&self) -> usize {
        self.stored.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stored.is_empty()
    }

    #[inline]
    pub fn contains(&self, pos: BlockPos) -> bool {
        (0..self.size.x).contains(&pos.x)
            && (0..self.size.y).contains(&pos.y)
            && (0..self.size.z).contains(&pos.z)
    }

    #[inline]
    fn offset(&self, pos: BlockPos) -> Option<usize> {
        if !self.contains(pos) {
            return None;
        }
        let (sy, sz) = (self.size.y as usize, self.size.z as usize);
        Some(pos.x as usize * sy * sz + pos.y as usize * sz + pos.z as usize)
    }

    pub(crate) fn check_pos(&self, pos: BlockPos) -> Result<usize, StructureError> {
        self.offset(pos).ok_or(StructureError::InvalidPosition {
            pos,
            size: self.size,
        })
    }

    pub fn add_block(
        &mut self,
        pos: impl Into<BlockPos>,
        name: &str,
        properties: Properties,
        nbt: Option<Payload>,
    ) -> Result<&mut Self, StructureError> {
        self.add_state(pos, BlockState::new(name, properties), nbt)
    }

    /// Places `state` at `pos`. An occupied position is replaced in place and keeps its
    /// insertion slot. Fails without touching the structure when `pos` is out of bounds.
    pub fn add_state(
        &mut self,
        pos: impl Into<BlockPos>,
        state: BlockState,
        nbt: Option<Payload>,
    ) -> Result<&mut Self, StructureError> {
        let pos = pos.into();
        let offset = self.check_pos(pos)?;
        let index = self.palette.get_or_insert(state);
        self.put(offset, pos, index, nbt.map(Arc::new));
        Ok(self)
    }

    /// Palette index of `state`, extending the palette on first sight.
    pub fn intern(&mut self, state: BlockState) -> u32 {
        self.palette.get_or_insert(state)
    }

    /// Places an already-interned palette index at `pos`.
    pub fn add_indexed(
        &mut self,
        pos: impl Into<BlockPos>,
        index: u32,
        nbt: Option<Payload>,
    ) -> Result<&mut Self, StructureError> {
        let pos = pos.into();
        let offset = self.check_pos(pos)?;
        if index as usize >= self.palette.len() {
            return Err(StructureError::InvalidPaletteIndex {
                pos,
                index,
                len: self.palette.len(),
            });
        }
        self.put(offset, pos, index, nbt.map(Arc::new));
        Ok(self)
    }

    // Caller guarantees `offset` belongs to `pos` and `index` is in the palette.
    pub(crate) fn put(
        &mut self,
        offset: usize,
        pos: BlockPos,
        index: u32,
        nbt: Option<Arc<Payload>>,
    ) {
        let block = StoredBlock {
            pos,
            state: index,
            nbt,
        };
        let slot = match self.cells[offset] {
            Some(slot) => {
                self.stored[slot as usize] = block;
                slot
            }
            None => {
                let slot = self.stored.len() as u32;
                self.stored.push(block);
                self.cells[offset] = Some(slot);
                slot
            }
        };
        if let Some(placed) = self.placed.get_mut() {
            let view = resolve(&self.palette, &self.stored[slot as usize]);
            match placed.get_mut(slot as usize) {
                Some(existing) => *existing = view,
                None => placed.push(view),
            }
        }
    }

    pub(crate) fn palette_mut(&mut self) -> &mut Palette {
        &mut self.palette
    }

    /// Block at `pos`, or `None` when out of bounds or unoccupied.
    pub fn block(&self, pos: impl Into<BlockPos>) -> Option<PlacedBlock> {
        let offset = self.offset(pos.into())?;
        let slot = self.cells[offset]?;
        Some(resolve(&self.palette, &self.stored[slot as usize]))
    }

    /// Palette index at `pos` without building a view.
    pub fn state_index(&self, pos: BlockPos) -> Option<u32> {
        let offset = self.offset(pos)?;
        let slot = self.cells[offset]?;
        Some(self.stored[slot as usize].state)
    }

    /// All blocks in insertion order. The view is built on first call and kept up to date
    /// by later additions.
    pub fn blocks(&self) -> &[PlacedBlock] {
        self.placed.get_or_init(|| {
            self.stored
                .iter()
                .map(|b| resolve(&self.palette, b))
                .collect()
        })
    }

    pub fn stored_blocks(&self) -> &[StoredBlock] {
        &self.stored
    }
}

fn resolve(palette: &Palette, b: &StoredBlock) -> PlacedBlock {
    PlacedBlock {
        pos: b.pos,
        state: Arc::clone(palette.entry(b.state)),
        nbt: b.nbt.clone(),
        palette_index: b.state,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_offsets_are_x_major() {
        let s = VoxelStructure::new((2, 3, 4));
        assert_eq!(s.offset(BlockPos::new(0, 0, 1)), Some(1));
        assert_eq!(s.offset(BlockPos::new(0, 1, 0)), Some(4));
        assert_eq!(s.offset(BlockPos::new(1, 0, 0)), Some(12));
        assert_eq!(s.offset(BlockPos::new(1, 2, 3)), Some(23));
        assert_eq!(s.offset(BlockPos::new(2, 0, 0)), None);
        assert_eq!(s.offset(BlockPos::new(0, -1, 0)), None);
    }

    #[test]
    fn cached_view_grows_with_additions() {
        let mut s = VoxelStructure::new((4, 1, 1));
        s.add_block((0, 0, 0), "minecraft:stone", Properties::new(), None)
            .unwrap();
        assert_eq!(s.blocks().len(), 1);
        s.add_block((1, 0, 0), "minecraft:dirt", Properties::new(), None)
            .unwrap();
        assert_eq!(s.blocks().len(), 2);
        assert_eq!(s.blocks()[1].state.name(), "minecraft:dirt");

        // Replacing keeps the slot and patches the cached view.
        s.add_block((0, 0, 0), "minecraft:glass", Properties::new(), None)
            .unwrap();
        assert_eq!(s.blocks().len(), 2);
        assert_eq!(s.blocks()[0].state.name(), "minecraft:glass");
        assert_eq!(s.palette().len(), 3);
    }

    #[test]
    fn negative_size_is_empty() {
        let s = VoxelStructure::new((-3, 2, 2));
        assert_eq!(s.size(), BlockPos::new(0, 2, 2));
        assert!(!s.contains(BlockPos::ORIGIN));
    }
}
