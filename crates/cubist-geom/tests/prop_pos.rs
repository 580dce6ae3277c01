use cubist_geom::{BlockPos, Vec3};
use proptest::prelude::*;

fn coord() -> impl Strategy<Value = i32> {
    -100_000i32..=100_000
}

fn chunk_size() -> impl Strategy<Value = i32> {
    1i32..=64
}

proptest! {
    // div_floor picks the chunk whose half-open span contains the coordinate
    #[test]
    fn div_floor_contains_pos(x in coord(), y in coord(), z in coord(), s in chunk_size()) {
        let p = BlockPos::new(x, y, z);
        let c = p.div_floor(s);
        prop_assert!(c.x * s <= x && x < (c.x + 1) * s);
        prop_assert!(c.y * s <= y && y < (c.y + 1) * s);
        prop_assert!(c.z * s <= z && z < (c.z + 1) * s);
    }

    #[test]
    fn offset_then_back_is_identity(x in coord(), y in coord(), z in coord(), d in -4i32..=4) {
        let p = BlockPos::new(x, y, z);
        prop_assert_eq!(p.offset(d, -d, d).offset(-d, d, -d), p);
    }
}

#[test]
fn center_is_half_block_in() {
    let c = BlockPos::new(2, -1, 0).center();
    assert_eq!(c, Vec3::new(2.5, -0.5, 0.5));
}

#[test]
fn distance_sq_avoids_root() {
    let a = Vec3::new(1.0, 2.0, 3.0);
    let b = Vec3::new(4.0, 6.0, 3.0);
    assert_eq!(a.distance_sq(b), 25.0);
}

#[test]
fn block_pos_serializes_as_array() {
    let p: BlockPos = [1, 2, 3].into();
    let arr: [i32; 3] = p.into();
    assert_eq!(arr, [1, 2, 3]);
    assert_eq!(p.to_string(), "(1, 2, 3)");
}
