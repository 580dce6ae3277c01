use std::cell::OnceCell;
use std::sync::Arc;

use cubist_blocks::{BlockState, Properties, RenderFlags};
use cubist_geom::{BlockPos, Vec3};
use cubist_structure::PlacedBlock;
use hashbrown::{HashMap, HashSet};

use crate::chunk::{Chunk, ChunkCoord, ChunkKey};
use crate::config::MeshConfig;
use crate::cull::{CullInfo, is_fully_occluded, needs_cull};
use crate::face::{Face, FaceCulls};
use crate::light::EmissiveLight;
use crate::mesh_build::MeshBuild;
use crate::model::BlockRenderer;
use crate::rebuild::{RebuildOptions, RebuildPoll, RebuildStats, RebuildTask};
use crate::source::BlockSource;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MeshKind {
    Opaque,
    Transparent,
}

/// One non-empty finalized chunk bucket.
#[derive(Clone, Debug)]
pub struct MeshEntry {
    pub coord: ChunkCoord,
    pub origin: Vec3,
    pub center: Vec3,
    pub kind: MeshKind,
    pub mesh: Arc<MeshBuild>,
}

// Everything the mesher derives from one palette entry.
#[derive(Debug)]
pub(crate) struct ResolvedState {
    pub state: Arc<BlockState>,
    pub properties: Properties,
    pub flags: RenderFlags,
    pub cull: CullInfo,
    pub emission: f32,
}

/// Work accumulated by a rebuild before it is committed.
#[derive(Default)]
pub(crate) struct Staging {
    pub chunks: HashMap<ChunkKey, (MeshBuild, MeshBuild)>,
    pub lights: HashMap<ChunkKey, Vec<EmissiveLight>>,
}

/// Owns all chunk meshes and emissive lights of one structure.
pub struct ChunkMeshBuilder<R> {
    renderer: R,
    config: MeshConfig,
    chunks: HashMap<ChunkKey, Chunk>,
    lights: HashMap<ChunkKey, Vec<EmissiveLight>>,
    generation: u64,
    states: Vec<Option<Arc<ResolvedState>>>,
    entries: OnceCell<Vec<MeshEntry>>,
    light_list: OnceCell<Vec<EmissiveLight>>,
}

impl<R: BlockRenderer> ChunkMeshBuilder<R> {
    pub fn new(renderer: R) -> Self {
        Self::with_config(renderer, MeshConfig::default())
    }

    pub fn with_config(renderer: R, mut config: MeshConfig) -> Self {
        config.chunk_size = config.chunk_size.max(1);
        Self {
            renderer,
            config,
            chunks: HashMap::new(),
            lights: HashMap::new(),
            generation: 0,
            states: Vec::new(),
            entries: OnceCell::new(),
            light_list: OnceCell::new(),
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn config(&self) -> &MeshConfig {
        &self.config
    }

    #[inline]
    pub fn chunk_size(&self) -> i32 {
        self.config.chunk_size
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Default options for a cooperative rebuild, taken from the config.
    pub fn rebuild_options(&self) -> RebuildOptions {
        RebuildOptions::default().with_time_slice(self.config.time_slice())
    }

    /// Rebuilds the given chunks (or everything) and commits before returning.
    pub fn update_structure_buffers<S: BlockSource + ?Sized>(
        &mut self,
        source: &S,
        chunks: Option<&[ChunkCoord]>,
    ) -> RebuildStats {
        let mut task = self.start_rebuild(chunks, RebuildOptions::blocking());
        loop {
            match task.resume(self, source) {
                RebuildPoll::Complete(stats) => return stats,
                RebuildPoll::Abandoned => return RebuildStats::default(),
                RebuildPoll::Yielded { .. } => {}
            }
        }
    }

    /// Starts a cooperative rebuild. Any task started earlier is abandoned on its next resume.
    pub fn start_rebuild(
        &mut self,
        chunks: Option<&[ChunkCoord]>,
        options: RebuildOptions,
    ) -> RebuildTask {
        self.generation += 1;
        let targets = chunks.map(|cs| cs.iter().copied().map(ChunkKey::new).collect());
        RebuildTask::new(self.generation, targets, options)
    }

    /// Invalidates every in-flight rebuild without starting a new one.
    pub fn cancel_pending_builds(&mut self) {
        self.generation += 1;
        log::debug!("rebuild cancel generation={}", self.generation);
    }

    /// Drops cached entries whose palette slot now holds a different state, so one
    /// builder can mesh several sources in turn.
    pub(crate) fn sync_state_cache<S: BlockSource + ?Sized>(&mut self, source: &S) {
        self.states.resize(source.palette_len(), None);
        for (index, slot) in self.states.iter_mut().enumerate() {
            let stale = match (slot.as_ref(), source.palette_state(index as u32)) {
                (Some(r), Some(s)) => !(Arc::ptr_eq(&r.state, &s) || r.state == s),
                (Some(_), None) => true,
                (None, _) => false,
            };
            if stale {
                *slot = None;
            }
        }
    }

    fn resolve(&mut self, index: u32, state: &Arc<BlockState>) -> Arc<ResolvedState> {
        if let Some(Some(r)) = self.states.get(index as usize) {
            return Arc::clone(r);
        }
        let name = state.name();
        let flags = self.renderer.flags(name);
        let mut properties = self.renderer.default_properties(name).unwrap_or_default();
        properties.extend(
            state
                .properties()
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        let resolved = Arc::new(ResolvedState {
            state: Arc::clone(state),
            cull: CullInfo {
                name: name.to_string(),
                opaque: flags.opaque,
                self_culling: flags.self_culling,
                waterlogged: state.is_waterlogged(),
            },
            emission: flags.emission(&properties),
            properties,
            flags,
        });
        if let Some(slot) = self.states.get_mut(index as usize) {
            *slot = Some(Arc::clone(&resolved));
        }
        resolved
    }

    fn neighbor<S: BlockSource + ?Sized>(
        &mut self,
        source: &S,
        pos: BlockPos,
    ) -> Option<Arc<ResolvedState>> {
        let index = source.palette_index_at(pos)?;
        if let Some(Some(r)) = self.states.get(index as usize) {
            return Some(Arc::clone(r));
        }
        let b = source.block(pos)?;
        Some(self.resolve(b.palette_index, &b.state))
    }

    /// Meshes one block into `staging`. Failures are logged and counted, never propagated.
    pub(crate) fn mesh_block<S: BlockSource + ?Sized>(
        &mut self,
        source: &S,
        block: &PlacedBlock,
        staging: &mut Staging,
        stats: &mut RebuildStats,
    ) {
        stats.blocks += 1;
        let here = self.resolve(block.palette_index, &block.state);
        let neighbors = Face::ALL.map(|f| self.neighbor(source, f.step(block.pos)));
        let neighbor_cull = |f: Face| neighbors[f.index()].as_deref().map(|r| &r.cull);

        if is_fully_occluded(Face::ALL.map(neighbor_cull)) {
            stats.occluded += 1;
            return;
        }
        let culls = FaceCulls::from_fn(|f| needs_cull(&here.cull, neighbor_cull(f), f));

        let mut mesh = match self
            .renderer
            .model_mesh(here.state.name(), &here.properties, culls)
        {
            Ok(mesh) => mesh,
            Err(e) => {
                log::warn!("skip block {} at {}: {}", here.state, block.pos, e);
                stats.skipped += 1;
                return;
            }
        };
        if let Some(extra) = self
            .renderer
            .special_mesh(&here.state, block.nbt.as_deref(), culls)
        {
            mesh.merge(extra);
        }
        if mesh.is_empty() {
            stats.empty += 1;
            return;
        }

        mesh.translate(block.pos.as_vec3());
        for q in &mut mesh.quads {
            let n = q.normal();
            for v in &mut q.vertices {
                v.normal = n;
                v.block_pos = block.pos;
                v.emission = here.emission;
            }
        }

        let key = ChunkKey::new(ChunkCoord::of(block.pos, self.config.chunk_size));
        let (opaque, transparent) = staging.chunks.entry(key).or_default();
        if here.flags.semi_transparent {
            transparent.add_mesh(&mesh);
        } else {
            opaque.add_mesh(&mesh);
        }
        stats.meshed += 1;

        if here.emission > 0.0 {
            staging.lights.entry(key).or_default().push(EmissiveLight::at(
                block.pos,
                here.emission,
                self.config.light_tint,
            ));
            stats.lights += 1;
        }
    }

    /// Applies a finished rebuild: clears the targeted chunks (all chunks when `targets`
    /// is `None`), fills them from `staging` and finalizes. Returns the finalized count.
    pub(crate) fn commit(&mut self, targets: Option<&HashSet<ChunkKey>>, staging: Staging) -> usize {
        let Staging {
            chunks: mut staged,
            lights,
        } = staging;
        let mut finalized = 0;
        match targets {
            None => {
                for (key, chunk) in self.chunks.iter_mut() {
                    let (o, t) = staged.remove(key).unwrap_or_default();
                    chunk.finalize(o, t);
                    finalized += 1;
                }
                self.lights.clear();
            }
            Some(keys) => {
                for key in keys {
                    if let Some(chunk) = self.chunks.get_mut(key) {
                        let (o, t) = staged.remove(key).unwrap_or_default();
                        chunk.finalize(o, t);
                        finalized += 1;
                    }
                    self.lights.remove(key);
                }
            }
        }
        let chunk_size = self.config.chunk_size;
        for (key, (o, t)) in staged {
            self.chunks
                .entry(key)
                .or_insert_with(|| Chunk::new(key.coord(), chunk_size))
                .finalize(o, t);
            finalized += 1;
        }
        self.lights.extend(lights);
        self.entries = OnceCell::new();
        self.light_list = OnceCell::new();
        finalized
    }

    fn sorted_keys(&self) -> Vec<ChunkKey> {
        let mut keys: Vec<ChunkKey> = self.chunks.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    /// Finalized chunk meshes: every opaque entry, then every transparent one.
    pub fn mesh_entries(&self) -> &[MeshEntry] {
        self.entries.get_or_init(|| {
            let keys = self.sorted_keys();
            let size = self.config.chunk_size;
            let mut out = Vec::new();
            for kind in [MeshKind::Opaque, MeshKind::Transparent] {
                for key in &keys {
                    let Some(chunk) = self.chunks.get(key) else {
                        continue;
                    };
                    let mesh = match kind {
                        MeshKind::Opaque => &chunk.opaque,
                        MeshKind::Transparent => &chunk.transparent,
                    };
                    if mesh.is_empty() {
                        continue;
                    }
                    out.push(MeshEntry {
                        coord: chunk.coord,
                        origin: chunk.origin,
                        center: chunk.coord.center(size),
                        kind,
                        mesh: Arc::clone(mesh),
                    });
                }
            }
            out
        })
    }

    /// Entries whose chunk center lies within `radius` of `center`.
    pub fn mesh_entries_within(&self, center: Vec3, radius: f32) -> Vec<MeshEntry> {
        let r2 = radius * radius;
        self.mesh_entries()
            .iter()
            .filter(|e| e.center.distance_sq(center) <= r2)
            .cloned()
            .collect()
    }

    pub fn meshes(&self) -> impl Iterator<Item = &Arc<MeshBuild>> + '_ {
        self.mesh_entries().iter().map(|e| &e.mesh)
    }

    pub fn emissive_lights(&self) -> &[EmissiveLight] {
        self.light_list.get_or_init(|| {
            let mut keys: Vec<&ChunkKey> = self.lights.keys().collect();
            keys.sort_unstable();
            keys.into_iter()
                .filter_map(|k| self.lights.get(k))
                .flatten()
                .copied()
                .collect()
        })
    }

    pub fn chunk(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&ChunkKey::new(coord))
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }
}
