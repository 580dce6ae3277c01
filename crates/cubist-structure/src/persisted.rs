use std::sync::Arc;

use cubist_blocks::BlockState;
use cubist_geom::BlockPos;
use serde::{Deserialize, Serialize};

use crate::error::StructureError;
use crate::structure::{Payload, VoxelStructure};

/// Interchange form of a structure: size, palette, and an explicit block list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PersistedStructure {
    pub size: BlockPos,
    pub palette: Vec<BlockState>,
    pub blocks: Vec<PersistedBlock>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PersistedBlock {
    pub pos: BlockPos,
    pub state: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbt: Option<Payload>,
}

impl PersistedStructure {
    pub fn from_json_str(s: &str) -> Result<Self, StructureError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn to_json_string(&self) -> Result<String, StructureError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl VoxelStructure {
    /// Builds a structure in one pass. Every position and palette index is validated
    /// before anything is stored; the first violation fails the whole load.
    pub fn from_persisted(data: PersistedStructure) -> Result<Self, StructureError> {
        let PersistedStructure {
            size,
            palette,
            blocks,
        } = data;
        let mut structure = VoxelStructure::new(size);
        let palette_len = palette.len();
        let mut offsets = Vec::with_capacity(blocks.len());
        for b in &blocks {
            offsets.push(structure.check_pos(b.pos)?);
            if b.state as usize >= palette_len {
                return Err(StructureError::InvalidPaletteIndex {
                    pos: b.pos,
                    index: b.state,
                    len: palette_len,
                });
            }
        }

        // Duplicate persisted entries fold onto their first slot.
        let remap: Vec<u32> = palette
            .into_iter()
            .map(|state| structure.palette_mut().get_or_insert(state))
            .collect();

        for (b, offset) in blocks.into_iter().zip(offsets) {
            structure.put(offset, b.pos, remap[b.state as usize], b.nbt.map(Arc::new));
        }
        log::debug!(
            "loaded structure size={} palette={} blocks={}",
            structure.size(),
            structure.palette().len(),
            structure.len()
        );
        Ok(structure)
    }

    pub fn to_persisted(&self) -> PersistedStructure {
        PersistedStructure {
            size: self.size(),
            palette: self.palette().iter().cloned().collect(),
            blocks: self
                .stored_blocks()
                .iter()
                .map(|b| PersistedBlock {
                    pos: b.pos,
                    state: b.state,
                    nbt: b.nbt.as_deref().cloned(),
                })
                .collect(),
        }
    }

    pub fn from_json_str(s: &str) -> Result<Self, StructureError> {
        Self::from_persisted(PersistedStructure::from_json_str(s)?)
    }
}
