use cubist_blocks::{BlockState, Properties, RenderFlags};
use cubist_geom::{BlockPos, Vec3};
use cubist_structure::Payload;

use crate::face::FaceCulls;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    #[error("no block definition for {0:?}")]
    UnknownBlock(String),
    #[error("model for {block:?} failed: {reason}")]
    Model { block: String, reason: String },
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vertex {
    pub pos: Vec3,
    pub uv: [f32; 2],
    pub color: [u8; 4],
    // Stamped by the mesher.
    pub normal: Vec3,
    pub block_pos: BlockPos,
    pub emission: f32,
}

impl Vertex {
    pub fn new(pos: Vec3, uv: [f32; 2], color: [u8; 4]) -> Self {
        Self {
            pos,
            uv,
            color,
            ..Self::default()
        }
    }
}

/// Four vertices, counter-clockwise when seen from the front.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quad {
    pub vertices: [Vertex; 4],
}

impl Quad {
    pub fn new(vertices: [Vertex; 4]) -> Self {
        Self { vertices }
    }

    /// Geometric face normal from the first triangle's winding.
    pub fn normal(&self) -> Vec3 {
        let [a, b, c, _] = self.vertices;
        (b.pos - a.pos).cross(c.pos - a.pos).normalized()
    }
}

/// Loose quad list produced by model providers in block-local space.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlockMesh {
    pub quads: Vec<Quad>,
}

impl BlockMesh {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    pub fn merge(&mut self, other: BlockMesh) {
        self.quads.extend(other.quads);
    }

    pub fn translate(&mut self, by: Vec3) {
        for q in &mut self.quads {
            for v in &mut q.vertices {
                v.pos += by;
            }
        }
    }
}

/// Everything the mesher needs from the outside world to turn blocks into geometry.
///
/// Implementations typically wrap a resource pack: flags come from block metadata,
/// models from blockstate/model JSON, special meshes from block-entity renderers.
pub trait BlockRenderer {
    /// Render flags for an identifier; unknown identifiers should return all-false flags.
    fn flags(&self, name: &str) -> RenderFlags;

    /// Default properties merged under a state's explicit properties before model lookup.
    fn default_properties(&self, _name: &str) -> Option<Properties> {
        None
    }

    /// Model geometry in block-local space with the culled faces left out.
    fn model_mesh(
        &self,
        name: &str,
        properties: &Properties,
        cull: FaceCulls,
    ) -> Result<BlockMesh, RenderError>;

    /// Extra geometry driven by the block's payload (signs, chests, banners...).
    fn special_mesh(
        &self,
        _state: &BlockState,
        _payload: Option<&Payload>,
        _cull: FaceCulls,
    ) -> Option<BlockMesh> {
        None
    }
}

impl<R: BlockRenderer + ?Sized> BlockRenderer for &R {
    fn flags(&self, name: &str) -> RenderFlags {
        (**self).flags(name)
    }

    fn default_properties(&self, name: &str) -> Option<Properties> {
        (**self).default_properties(name)
    }

    fn model_mesh(
        &self,
        name: &str,
        properties: &Properties,
        cull: FaceCulls,
    ) -> Result<BlockMesh, RenderError> {
        (**self).model_mesh(name, properties, cull)
    }

    fn special_mesh(
        &self,
        state: &BlockState,
        payload: Option<&Payload>,
        cull: FaceCulls,
    ) -> Option<BlockMesh> {
        (**self).special_mesh(state, payload, cull)
    }
}
