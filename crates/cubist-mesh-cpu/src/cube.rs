use cubist_blocks::{BlockRegistry, Properties, RenderFlags, Shape};
use cubist_geom::Vec3;

use crate::face::{Face, FaceCulls};
use crate::model::{BlockMesh, BlockRenderer, Quad, RenderError, Vertex};

const OPAQUE_ALPHA: u8 = 255;
const TRANSLUCENT_ALPHA: u8 = 160;

// Unit-cube corners per face, counter-clockwise seen from outside. Indexed by `Face::index`.
const FACE_CORNERS: [[[f32; 3]; 4]; 6] = [
    [[0., 1., 0.], [0., 1., 1.], [1., 1., 1.], [1., 1., 0.]],
    [[0., 0., 0.], [1., 0., 0.], [1., 0., 1.], [0., 0., 1.]],
    [[1., 0., 0.], [1., 1., 0.], [1., 1., 1.], [1., 0., 1.]],
    [[0., 0., 0.], [0., 0., 1.], [0., 1., 1.], [0., 1., 0.]],
    [[0., 0., 1.], [1., 0., 1.], [1., 1., 1.], [0., 1., 1.]],
    [[0., 0., 0.], [0., 1., 0.], [1., 1., 0.], [1., 0., 0.]],
];

const FACE_UVS: [[f32; 2]; 4] = [[0., 0.], [1., 0.], [1., 1.], [0., 1.]];

// Simple directional shade so faces read apart without lighting.
#[inline]
fn face_shade(face: Face) -> u8 {
    match face {
        Face::PosY => 255,
        Face::NegY => 128,
        Face::PosX | Face::NegX => 204,
        Face::PosZ | Face::NegZ => 230,
    }
}

pub(crate) fn cube_face(face: Face, alpha: u8) -> Quad {
    let s = face_shade(face);
    let corners = FACE_CORNERS[face.index()];
    let vertex = |i: usize| {
        let [x, y, z] = corners[i];
        Vertex::new(Vec3::new(x, y, z), FACE_UVS[i], [s, s, s, alpha])
    };
    Quad::new([vertex(0), vertex(1), vertex(2), vertex(3)])
}

/// Built-in renderer: every registered `cube` block is a shaded unit cube.
#[derive(Clone, Debug, Default)]
pub struct CubeModels {
    pub registry: BlockRegistry,
}

impl CubeModels {
    pub fn new(registry: BlockRegistry) -> Self {
        Self { registry }
    }
}

impl BlockRenderer for CubeModels {
    fn flags(&self, name: &str) -> RenderFlags {
        self.registry.flags(name)
    }

    fn default_properties(&self, name: &str) -> Option<Properties> {
        self.registry.default_properties(name).cloned()
    }

    fn model_mesh(
        &self,
        name: &str,
        _properties: &Properties,
        cull: FaceCulls,
    ) -> Result<BlockMesh, RenderError> {
        let ty = self
            .registry
            .get_or_unknown(name)
            .ok_or_else(|| RenderError::UnknownBlock(name.to_string()))?;
        let mut mesh = BlockMesh::new();
        if ty.shape == Shape::None {
            return Ok(mesh);
        }
        let alpha = if ty.flags.semi_transparent {
            TRANSLUCENT_ALPHA
        } else {
            OPAQUE_ALPHA
        };
        for face in Face::ALL {
            if !cull.is_culled(face) {
                mesh.quads.push(cube_face(face, alpha));
            }
        }
        Ok(mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_winding_matches_face_normals() {
        for face in Face::ALL {
            assert_eq!(cube_face(face, OPAQUE_ALPHA).normal(), face.normal(), "{face:?}");
        }
    }

    #[test]
    fn culled_faces_are_left_out() {
        let reg = BlockRegistry::from_toml_str("[[blocks]]\nname = \"stone\"\n").unwrap();
        let models = CubeModels::new(reg);
        let mut cull = FaceCulls::NONE;
        cull.set(Face::PosY, true);
        cull.set(Face::NegX, true);
        let mesh = models
            .model_mesh("minecraft:stone", &Properties::new(), cull)
            .unwrap();
        assert_eq!(mesh.quads.len(), 4);
        assert!(matches!(
            models.model_mesh("minecraft:nope", &Properties::new(), FaceCulls::NONE),
            Err(RenderError::UnknownBlock(_))
        ));
    }
}
