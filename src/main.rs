use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use cubist::blocks::BlockRegistry;
use cubist::mesh::{ChunkCoord, ChunkMeshBuilder, CubeModels, MeshConfig, MeshKind, RebuildPoll};
use cubist::schem::LoadOptions;
use cubist::load_structure;

#[derive(Parser)]
#[command(name = "cubist", about = "Mesh voxel structures and schematics")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print size and palette of a structure or schematic
    Info {
        input: PathBuf,
        /// Extra identifiers treated as empty when loading schematics
        #[arg(long = "empty")]
        empty: Vec<String>,
    },
    /// Convert a schematic (or structure) to structure JSON
    Convert {
        input: PathBuf,
        #[arg(long, short)]
        output: PathBuf,
        #[arg(long = "empty")]
        empty: Vec<String>,
    },
    /// Build chunk meshes and report what was produced
    Mesh {
        input: PathBuf,
        /// Block flag catalog (TOML)
        #[arg(long)]
        blocks: PathBuf,
        /// Mesher settings (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Only rebuild these chunks, given as X Y Z triples
        #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], allow_hyphen_values = true)]
        chunk: Vec<i32>,
        /// Rebuild in time slices instead of blocking
        #[arg(long)]
        cooperative: bool,
    },
}

fn load_options(empty: Vec<String>) -> LoadOptions {
    let mut opts = LoadOptions::default();
    opts.empty_blocks.extend(empty);
    opts
}

fn info(input: PathBuf, empty: Vec<String>) -> Result<(), Box<dyn Error>> {
    let (format, s) = load_structure(&input, &load_options(empty))?;
    println!("{} ({format:?})", input.display());
    println!("size {}  blocks {}  palette {}", s.size(), s.len(), s.palette().len());
    for (i, state) in s.palette().iter().enumerate() {
        println!("  {i:>4} {state}");
    }
    Ok(())
}

fn convert(input: PathBuf, output: PathBuf, empty: Vec<String>) -> Result<(), Box<dyn Error>> {
    let (_, s) = load_structure(&input, &load_options(empty))?;
    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    fs::write(&output, s.to_persisted().to_json_string()?)?;
    println!("Saved structure to {}", output.display());
    Ok(())
}

fn mesh(
    input: PathBuf,
    blocks: PathBuf,
    config: Option<PathBuf>,
    chunk: Vec<i32>,
    cooperative: bool,
) -> Result<(), Box<dyn Error>> {
    let registry = BlockRegistry::load_from_path(&blocks)?;
    let config = match config {
        Some(path) => MeshConfig::from_toml_str(&fs::read_to_string(path)?)?,
        None => MeshConfig::default(),
    };
    let (_, s) = load_structure(&input, &LoadOptions::default())?;
    let targets: Vec<ChunkCoord> = chunk
        .chunks_exact(3)
        .map(|c| ChunkCoord::new(c[0], c[1], c[2]))
        .collect();
    let targets = (!targets.is_empty()).then_some(targets.as_slice());

    let mut builder = ChunkMeshBuilder::with_config(CubeModels::new(registry), config);
    let stats = if cooperative {
        let opts = builder
            .rebuild_options()
            .on_progress(|done, total| log::info!("rebuild {done}/{total}"));
        let mut task = builder.start_rebuild(targets, opts);
        loop {
            match task.resume(&mut builder, &s) {
                RebuildPoll::Yielded { .. } => continue,
                RebuildPoll::Complete(stats) => break stats,
                RebuildPoll::Abandoned => return Err("rebuild abandoned".into()),
            }
        }
    } else {
        builder.update_structure_buffers(&s, targets)
    };

    println!(
        "blocks {}  meshed {}  occluded {}  empty {}  skipped {}  chunks {}  lights {}  ms {}",
        stats.blocks,
        stats.meshed,
        stats.occluded,
        stats.empty,
        stats.skipped,
        stats.chunks,
        stats.lights,
        stats.ms
    );
    for e in builder.mesh_entries() {
        let kind = match e.kind {
            MeshKind::Opaque => "opaque",
            MeshKind::Transparent => "transparent",
        };
        println!(
            "  chunk ({}, {}, {}) {kind:<11} quads {}",
            e.coord.cx,
            e.coord.cy,
            e.coord.cz,
            e.mesh.quad_count()
        );
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Info { input, empty } => info(input, empty),
        Command::Convert {
            input,
            output,
            empty,
        } => convert(input, output, empty),
        Command::Mesh {
            input,
            blocks,
            config,
            chunk,
            cooperative,
        } => mesh(input, blocks, config, chunk, cooperative),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
