use std::collections::{HashMap, HashSet};

use cubist_blocks::BlockState;
use cubist_geom::BlockPos;
use cubist_structure::{Payload, StructureError, VoxelStructure};
use serde::{Deserialize, Serialize};

use crate::packed::{PackedWord, bits_per_block, decode_block_states};

#[derive(Debug, thiserror::Error)]
pub enum SchemError {
    #[error(transparent)]
    Structure(#[from] StructureError),
    #[error("region {region:?} uses palette index {index}, palette has {len} entries")]
    PaletteIndex {
        region: String,
        index: u32,
        len: usize,
    },
    #[error("schematic json: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TileEntity {
    /// Region-local position, relative to the region's minimum corner.
    pub pos: BlockPos,
    pub data: Payload,
}

/// One packed region. `size` may be negative per axis, in which case the region
/// extends from `position` toward negative coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SchematicRegion {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub position: BlockPos,
    pub size: BlockPos,
    pub palette: Vec<BlockState>,
    pub block_states: Vec<i64>,
    #[serde(default)]
    pub tile_entities: Vec<TileEntity>,
}

impl SchematicRegion {
    /// Absolute extent per axis.
    pub fn extent(&self) -> BlockPos {
        BlockPos::new(
            self.size.x.abs(),
            self.size.y.abs(),
            self.size.z.abs(),
        )
    }

    /// Minimum corner in schematic space.
    pub fn min_corner(&self) -> BlockPos {
        let axis = |p: i32, s: i32| if s < 0 { p + s + 1 } else { p };
        BlockPos::new(
            axis(self.position.x, self.size.x),
            axis(self.position.y, self.size.y),
            axis(self.position.z, self.size.z),
        )
    }

    fn max_corner(&self) -> BlockPos {
        let min = self.min_corner();
        let e = self.extent();
        BlockPos::new(min.x + e.x, min.y + e.y, min.z + e.z)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Schematic {
    pub regions: Vec<SchematicRegion>,
}

#[derive(Clone, Debug)]
pub struct LoadOptions {
    /// Identifiers dropped while loading instead of becoming stored blocks.
    pub empty_blocks: Vec<String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            empty_blocks: vec!["minecraft:air".to_string()],
        }
    }
}

impl Schematic {
    pub fn from_json_str(s: &str) -> Result<Self, SchemError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Union bounding box `(min, size)` of all regions.
    pub fn bounds(&self) -> (BlockPos, BlockPos) {
        let mut it = self.regions.iter();
        let Some(first) = it.next() else {
            return (BlockPos::ORIGIN, BlockPos::ORIGIN);
        };
        let (mut min, mut max) = (first.min_corner(), first.max_corner());
        for r in it {
            let (a, b) = (r.min_corner(), r.max_corner());
            min = BlockPos::new(min.x.min(a.x), min.y.min(a.y), min.z.min(a.z));
            max = BlockPos::new(max.x.max(b.x), max.y.max(b.y), max.z.max(b.z));
        }
        (min, BlockPos::new(max.x - min.x, max.y - min.y, max.z - min.z))
    }

    /// Decodes every region into one structure sized to the union of the regions.
    pub fn to_structure(&self, opts: &LoadOptions) -> Result<VoxelStructure, SchemError> {
        let (origin, size) = self.bounds();
        let mut structure = VoxelStructure::new(size);
        let empty: HashSet<&str> = opts.empty_blocks.iter().map(String::as_str).collect();

        for region in &self.regions {
            let extent = region.extent();
            let (w, h, d) = (extent.x as usize, extent.y as usize, extent.z as usize);
            let words: Vec<PackedWord> = region
                .block_states
                .iter()
                .copied()
                .map(PackedWord::from)
                .collect();
            log::debug!(
                "decoding region {:?} extent={} palette={} bits={} words={}",
                region.name,
                extent,
                region.palette.len(),
                bits_per_block(region.palette.len()),
                words.len()
            );
            let grid = decode_block_states(&words, region.palette.len(), w, h, d);

            // Region palette index -> structure palette index; `None` for empty blocks.
            let remap: Vec<Option<u32>> = region
                .palette
                .iter()
                .map(|state| {
                    if empty.contains(state.name()) {
                        None
                    } else {
                        Some(structure.intern(state.clone()))
                    }
                })
                .collect();
            let payloads: HashMap<BlockPos, &Payload> = region
                .tile_entities
                .iter()
                .map(|t| (t.pos, &t.data))
                .collect();

            let min = region.min_corner();
            let shift = BlockPos::new(min.x - origin.x, min.y - origin.y, min.z - origin.z);
            for (x, y, z, index) in grid.iter() {
                let mapped = remap
                    .get(index as usize)
                    .ok_or_else(|| SchemError::PaletteIndex {
                        region: region.name.clone(),
                        index,
                        len: region.palette.len(),
                    })?;
                let Some(state) = *mapped else {
                    continue;
                };
                let local = BlockPos::new(x as i32, y as i32, z as i32);
                let nbt = payloads.get(&local).map(|p| (*p).clone());
                structure.add_indexed(local.offset(shift.x, shift.y, shift.z), state, nbt)?;
            }
        }
        Ok(structure)
    }
}
