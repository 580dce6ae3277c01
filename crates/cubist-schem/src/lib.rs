//! Schematic loading: bit-packed block-state regions decoded into voxel structures.
#![forbid(unsafe_code)]

pub mod packed;
mod schematic;

pub use packed::{
    PackedWord, StateIndexGrid, bits_per_block, decode_block_states, pack_block_states,
};
pub use schematic::{LoadOptions, SchemError, Schematic, SchematicRegion, TileEntity};
