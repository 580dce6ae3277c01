//! CPU meshing crate: chunk-partitioned, face-culled block meshes with emissive lights.
#![forbid(unsafe_code)]

mod builder;
mod chunk;
mod config;
mod cube;
mod cull;
mod face;
mod light;
mod mesh_build;
mod model;
mod rebuild;
mod source;

pub use builder::{ChunkMeshBuilder, MeshEntry, MeshKind};
pub use chunk::{Chunk, ChunkCoord, ChunkKey};
pub use config::MeshConfig;
pub use cube::CubeModels;
pub use cull::{CullInfo, is_fully_occluded, needs_cull};
pub use face::{Face, FaceCulls};
pub use light::EmissiveLight;
pub use mesh_build::MeshBuild;
pub use model::{BlockMesh, BlockRenderer, Quad, RenderError, Vertex};
pub use rebuild::{RebuildOptions, RebuildPoll, RebuildStats, RebuildTask};
pub use source::BlockSource;
