use cubist_blocks::BlockState;
use cubist_geom::BlockPos;
use cubist_schem::{
    LoadOptions, SchemError, Schematic, SchematicRegion, StateIndexGrid, TileEntity,
    pack_block_states,
};
use serde_json::json;

fn palette() -> Vec<BlockState> {
    vec![
        BlockState::simple("minecraft:air"),
        BlockState::simple("minecraft:stone"),
        BlockState::simple("minecraft:chest").with_property("facing", "west"),
    ]
}

fn region(name: &str, position: BlockPos, size: BlockPos, cells: &[((usize, usize, usize), u32)]) -> SchematicRegion {
    let (w, h, d) = (size.x.unsigned_abs() as usize, size.y.unsigned_abs() as usize, size.z.unsigned_abs() as usize);
    let mut grid = StateIndexGrid::new(w, h, d);
    for &((x, y, z), v) in cells {
        grid.set(x, y, z, v);
    }
    SchematicRegion {
        name: name.to_string(),
        position,
        size,
        palette: palette(),
        block_states: pack_block_states(&grid, 3),
        tile_entities: Vec::new(),
    }
}

#[test]
fn single_region_drops_air_and_attaches_payloads() {
    let mut r = region(
        "main",
        BlockPos::ORIGIN,
        BlockPos::new(2, 2, 2),
        &[((0, 0, 0), 1), ((1, 1, 0), 2), ((1, 0, 1), 1)],
    );
    r.tile_entities.push(TileEntity {
        pos: BlockPos::new(1, 1, 0),
        data: json!({"Items": ["minecraft:apple"]}),
    });
    let schem = Schematic { regions: vec![r] };
    let s = schem.to_structure(&LoadOptions::default()).unwrap();
    assert_eq!(s.size(), BlockPos::new(2, 2, 2));
    assert_eq!(s.len(), 3);
    assert!(s.block((0, 1, 0)).is_none());
    let chest = s.block((1, 1, 0)).unwrap();
    assert_eq!(chest.state.key(), "minecraft:chest[facing=west]");
    assert_eq!(chest.nbt.as_deref(), Some(&json!({"Items": ["minecraft:apple"]})));
    assert!(s.palette().iter().all(|st| st.name() != "minecraft:air"));
}

#[test]
fn negative_sizes_and_multiple_regions_share_one_box() {
    // Region b extends from (0,0,0) toward -x: it covers x in [-1, 0].
    let a = region("a", BlockPos::new(1, 0, 0), BlockPos::new(1, 1, 1), &[((0, 0, 0), 1)]);
    let b = region("b", BlockPos::new(0, 0, 0), BlockPos::new(-2, 1, 1), &[((0, 0, 0), 2), ((1, 0, 0), 1)]);
    let schem = Schematic { regions: vec![a, b] };
    let (min, size) = schem.bounds();
    assert_eq!(min, BlockPos::new(-1, 0, 0));
    assert_eq!(size, BlockPos::new(3, 1, 1));

    let s = schem.to_structure(&LoadOptions::default()).unwrap();
    assert_eq!(s.block((0, 0, 0)).unwrap().state.name(), "minecraft:chest");
    assert_eq!(s.block((1, 0, 0)).unwrap().state.name(), "minecraft:stone");
    assert_eq!(s.block((2, 0, 0)).unwrap().state.name(), "minecraft:stone");
    // stone is shared across regions
    assert_eq!(s.palette().len(), 2);
}

#[test]
fn custom_empty_blocks() {
    let r = region("main", BlockPos::ORIGIN, BlockPos::new(2, 1, 1), &[((0, 0, 0), 1), ((1, 0, 0), 0)]);
    let opts = LoadOptions {
        empty_blocks: vec!["minecraft:stone".into()],
    };
    let s = Schematic { regions: vec![r] }.to_structure(&opts).unwrap();
    assert_eq!(s.len(), 1);
    assert_eq!(s.block((1, 0, 0)).unwrap().state.name(), "minecraft:air");
}

#[test]
fn index_past_palette_is_an_error() {
    let mut r = region("broken", BlockPos::ORIGIN, BlockPos::new(1, 1, 1), &[]);
    // 2-bit entry 0 set to 3 while the palette only has 3 entries.
    r.block_states = vec![0b11];
    let err = Schematic { regions: vec![r] }
        .to_structure(&LoadOptions::default())
        .unwrap_err();
    assert!(matches!(err, SchemError::PaletteIndex { index: 3, len: 3, .. }));
}

#[test]
fn json_schematic_loads() {
    // 2-bit entries: 4 = 0b01_00 -> x=0 is air, x=1 is glowstone.
    let text = r#"{
        "regions": [{
            "name": "json",
            "position": [0, 0, 0],
            "size": [2, 1, 1],
            "palette": [{ "Name": "minecraft:air" }, { "Name": "minecraft:glowstone" }],
            "block_states": [4]
        }]
    }"#;
    let s = Schematic::from_json_str(text)
        .unwrap()
        .to_structure(&LoadOptions::default())
        .unwrap();
    assert_eq!(s.len(), 1);
    assert!(s.block((0, 0, 0)).is_none());
    assert_eq!(s.block((1, 0, 0)).unwrap().state.name(), "minecraft:glowstone");
    assert!(matches!(Schematic::from_json_str("{"), Err(SchemError::Json(_))));
}
