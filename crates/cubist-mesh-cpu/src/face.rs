use cubist_geom::{BlockPos, Vec3};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Face {
    PosY = 0,
    NegY = 1,
    PosX = 2,
    NegX = 3,
    PosZ = 4,
    NegZ = 5,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::PosY,
        Face::NegY,
        Face::PosX,
        Face::NegX,
        Face::PosZ,
        Face::NegZ,
    ];

    /// Returns the `[0..6)` index of this face.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns the unit-normal vector for this face.
    #[inline]
    pub fn normal(self) -> Vec3 {
        let (dx, dy, dz) = self.delta();
        Vec3::new(dx as f32, dy as f32, dz as f32)
    }

    /// Returns the integer grid delta `(dx,dy,dz)` when stepping out of this face.
    #[inline]
    pub fn delta(self) -> (i32, i32, i32) {
        match self {
            Face::PosY => (0, 1, 0),
            Face::NegY => (0, -1, 0),
            Face::PosX => (1, 0, 0),
            Face::NegX => (-1, 0, 0),
            Face::PosZ => (0, 0, 1),
            Face::NegZ => (0, 0, -1),
        }
    }

    /// Neighbor position across this face.
    #[inline]
    pub fn step(self, pos: BlockPos) -> BlockPos {
        let (dx, dy, dz) = self.delta();
        pos.offset(dx, dy, dz)
    }
}

/// Per-face cull flags handed to model providers; `true` means the face is hidden.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FaceCulls([bool; 6]);

impl FaceCulls {
    pub const NONE: FaceCulls = FaceCulls([false; 6]);
    pub const ALL: FaceCulls = FaceCulls([true; 6]);

    #[inline]
    pub fn is_culled(self, face: Face) -> bool {
        self.0[face.index()]
    }

    #[inline]
    pub fn set(&mut self, face: Face, culled: bool) {
        self.0[face.index()] = culled;
    }

    pub fn from_fn(mut f: impl FnMut(Face) -> bool) -> Self {
        let mut culls = FaceCulls::NONE;
        for face in Face::ALL {
            culls.set(face, f(face));
        }
        culls
    }

    pub fn count(self) -> usize {
        self.0.iter().filter(|c| **c).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_are_unit_and_opposite_in_pairs() {
        let p = BlockPos::new(3, -2, 7);
        for pair in Face::ALL.chunks(2) {
            let (a, b) = (pair[0], pair[1]);
            assert_eq!(b.step(a.step(p)), p);
            assert_eq!(a.normal() + b.normal(), Vec3::ZERO);
        }
    }

    #[test]
    fn culls_by_face() {
        let c = FaceCulls::from_fn(|f| matches!(f, Face::PosX | Face::NegZ));
        assert_eq!(c.count(), 2);
        assert!(c.is_culled(Face::NegZ));
        assert!(!c.is_culled(Face::PosY));
        assert_eq!(FaceCulls::ALL.count(), 6);
    }
}
