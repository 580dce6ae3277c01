use crate::face::Face;

/// The per-state facts face culling looks at.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CullInfo {
    pub name: String,
    pub opaque: bool,
    pub self_culling: bool,
    pub waterlogged: bool,
}

/// Whether the face of `here` pointing at `face` is hidden by `neighbor`.
///
/// A missing neighbor never hides anything. Same-identifier neighbors hide each other when
/// self-culling; opaque neighbors hide everything except the top face of a waterlogged
/// block; otherwise only water meeting water is hidden.
#[inline]
pub fn needs_cull(here: &CullInfo, neighbor: Option<&CullInfo>, face: Face) -> bool {
    let Some(n) = neighbor else {
        return false;
    };
    if n.name == here.name && n.self_culling {
        return true;
    }
    if n.opaque {
        return !(face == Face::PosY && here.waterlogged);
    }
    here.waterlogged && n.waterlogged
}

/// True when all six neighbors exist and are opaque.
#[inline]
pub fn is_fully_occluded<'a>(neighbors: impl IntoIterator<Item = Option<&'a CullInfo>>) -> bool {
    let mut seen = 0;
    for n in neighbors {
        match n {
            Some(n) if n.opaque => seen += 1,
            _ => return false,
        }
    }
    seen == 6
}
