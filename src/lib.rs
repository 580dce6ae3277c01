//! cubist: load voxel structures and schematics, then turn them into chunked meshes.
//!
//! The workspace crates are re-exported under short names; [`load_structure`] picks the
//! right loader for a JSON input.
#![forbid(unsafe_code)]

pub use cubist_blocks as blocks;
pub use cubist_geom as geom;
pub use cubist_mesh_cpu as mesh;
pub use cubist_schem as schem;
pub use cubist_structure as structure;

mod load;

pub use load::{InputFormat, LoadError, load_structure, load_structure_str};
