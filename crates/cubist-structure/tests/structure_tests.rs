use cubist_blocks::{BlockState, Properties};
use cubist_geom::BlockPos;
use cubist_structure::{PersistedBlock, PersistedStructure, StructureError, VoxelStructure};
use serde_json::json;

fn props(pairs: &[(&str, &str)]) -> Properties {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn single_stone_scenario() {
    let mut s = VoxelStructure::new((1, 1, 1));
    s.add_block((0, 0, 0), "minecraft:stone", Properties::new(), None)
        .unwrap();
    assert_eq!(s.blocks().len(), 1);
    let b = s.block((0, 0, 0)).unwrap();
    assert_eq!(b.state.name(), "minecraft:stone");
    assert!(s.block((1, 0, 0)).is_none());
}

#[test]
fn out_of_bounds_add_leaves_structure_unmodified() {
    let mut s = VoxelStructure::new((2, 2, 2));
    s.add_block((1, 1, 1), "minecraft:stone", Properties::new(), None)
        .unwrap();
    let err = s
        .add_block((2, 0, 0), "minecraft:dirt", Properties::new(), None)
        .unwrap_err();
    match err {
        StructureError::InvalidPosition { pos, size } => {
            assert_eq!(pos, BlockPos::new(2, 0, 0));
            assert_eq!(size, BlockPos::new(2, 2, 2));
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(s.add_block((0, -1, 0), "minecraft:dirt", Properties::new(), None).is_err());
    assert_eq!(s.len(), 1);
    assert_eq!(s.blocks().len(), 1);
    assert_eq!(s.palette().len(), 1);
}

#[test]
fn palette_deduplicates_equal_states() {
    let mut s = VoxelStructure::new((3, 1, 1));
    let p = props(&[("axis", "y")]);
    s.add_block((0, 0, 0), "minecraft:oak_log", p.clone(), None)
        .unwrap()
        .add_block((1, 0, 0), "minecraft:oak_log", p, None)
        .unwrap();
    assert_eq!(s.palette().len(), 1);
    s.add_block((2, 0, 0), "minecraft:oak_log", props(&[("axis", "x")]), None)
        .unwrap();
    assert_eq!(s.palette().len(), 2);
    assert_eq!(s.block((0, 0, 0)).unwrap().palette_index, 0);
    assert_eq!(s.block((2, 0, 0)).unwrap().palette_index, 1);
}

#[test]
fn blocks_keep_insertion_order_and_payload() {
    let mut s = VoxelStructure::new((3, 3, 3));
    s.add_block((2, 2, 2), "minecraft:chest", Properties::new(), Some(json!({"Items": []})))
        .unwrap();
    s.add_block((0, 0, 0), "minecraft:stone", Properties::new(), None)
        .unwrap();
    let order: Vec<_> = s.blocks().iter().map(|b| b.pos).collect();
    assert_eq!(order, vec![BlockPos::new(2, 2, 2), BlockPos::ORIGIN]);
    let chest = s.block((2, 2, 2)).unwrap();
    assert_eq!(chest.nbt.as_deref(), Some(&json!({"Items": []})));
}

#[test]
fn persisted_load_validates_up_front() {
    let data = PersistedStructure {
        size: BlockPos::new(2, 1, 1),
        palette: vec![BlockState::simple("minecraft:stone")],
        blocks: vec![
            PersistedBlock {
                pos: BlockPos::new(0, 0, 0),
                state: 0,
                nbt: None,
            },
            PersistedBlock {
                pos: BlockPos::new(5, 0, 0),
                state: 0,
                nbt: None,
            },
        ],
    };
    assert!(matches!(
        VoxelStructure::from_persisted(data),
        Err(StructureError::InvalidPosition { .. })
    ));

    let bad_index = PersistedStructure {
        size: BlockPos::new(1, 1, 1),
        palette: vec![BlockState::simple("minecraft:stone")],
        blocks: vec![PersistedBlock {
            pos: BlockPos::ORIGIN,
            state: 3,
            nbt: None,
        }],
    };
    assert!(matches!(
        VoxelStructure::from_persisted(bad_index),
        Err(StructureError::InvalidPaletteIndex { index: 3, len: 1, .. })
    ));
}

#[test]
fn persisted_json_round_trip() {
    let text = r#"{
        "size": [2, 2, 1],
        "palette": [
            { "Name": "minecraft:stone" },
            { "Name": "minecraft:furnace", "Properties": { "lit": "true", "facing": "east" } },
            { "Name": "minecraft:stone" }
        ],
        "blocks": [
            { "pos": [0, 0, 0], "state": 0 },
            { "pos": [1, 1, 0], "state": 1, "nbt": { "BurnTime": 20 } },
            { "pos": [1, 0, 0], "state": 2 }
        ]
    }"#;
    let s = VoxelStructure::from_json_str(text).unwrap();
    assert_eq!(s.len(), 3);
    // Duplicate palette entry folded onto slot 0.
    assert_eq!(s.palette().len(), 2);
    assert_eq!(s.block((1, 0, 0)).unwrap().palette_index, 0);
    let furnace = s.block((1, 1, 0)).unwrap();
    assert_eq!(furnace.state.key(), "minecraft:furnace[facing=east,lit=true]");

    let saved = s.to_persisted();
    let reloaded =
        VoxelStructure::from_persisted(PersistedStructure::from_json_str(&saved.to_json_string().unwrap()).unwrap())
            .unwrap();
    assert_eq!(reloaded.blocks(), s.blocks());
}

#[test]
fn separator_characters_in_values_do_not_merge_states() {
    let mut s = VoxelStructure::new((2, 1, 1));
    s.add_block((0, 0, 0), "minecraft:sign", props(&[("a", "1"), ("b", "2")]), None)
        .unwrap();
    s.add_block((1, 0, 0), "minecraft:sign", props(&[("a", "1,b=2")]), None)
        .unwrap();
    assert_eq!(s.palette().len(), 2);
    assert_eq!(s.block((1, 0, 0)).unwrap().state.property("a"), Some("1,b=2"));
    assert_eq!(s.block((0, 0, 0)).unwrap().state.property("b"), Some("2"));
}
