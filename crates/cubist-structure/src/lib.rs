//! Voxel structures: a dense positional block store over a fixed bound with a
//! deduplicated palette of block states.
#![forbid(unsafe_code)]

mod error;
mod palette;
mod persisted;
mod structure;

pub use error::StructureError;
pub use palette::Palette;
pub use persisted::{PersistedBlock, PersistedStructure};
pub use structure::{Payload, PlacedBlock, StoredBlock, VoxelStructure};
