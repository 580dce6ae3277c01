use std::time::{Duration, Instant};

use hashbrown::HashSet;

use crate::builder::{ChunkMeshBuilder, Staging};
use crate::chunk::{ChunkCoord, ChunkKey};
use crate::model::BlockRenderer;
use crate::source::BlockSource;

type ProgressFn = Box<dyn FnMut(usize, usize)>;

pub struct RebuildOptions {
    /// Budget per `resume` call; checked after each block.
    pub time_slice: Duration,
    /// Called with `(completed, total)` on every yield and once at completion.
    pub on_progress: Option<ProgressFn>,
}

impl Default for RebuildOptions {
    fn default() -> Self {
        Self {
            time_slice: Duration::from_millis(8),
            on_progress: None,
        }
    }
}

impl RebuildOptions {
    /// Never yields.
    pub fn blocking() -> Self {
        Self {
            time_slice: Duration::MAX,
            on_progress: None,
        }
    }

    pub fn with_time_slice(mut self, time_slice: Duration) -> Self {
        self.time_slice = time_slice;
        self
    }

    pub fn on_progress(mut self, f: impl FnMut(usize, usize) + 'static) -> Self {
        self.on_progress = Some(Box::new(f));
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RebuildStats {
    /// Blocks handed to the mesher.
    pub blocks: usize,
    pub meshed: usize,
    pub occluded: usize,
    pub empty: usize,
    /// Blocks whose model could not be resolved.
    pub skipped: usize,
    pub chunks: usize,
    pub lights: usize,
    pub ms: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RebuildPoll {
    Yielded { completed: usize, total: usize },
    Complete(RebuildStats),
    Abandoned,
}

enum TaskState {
    Running,
    Done(RebuildStats),
    Abandoned,
}

/// A cooperative rebuild. Advance it with [`RebuildTask::resume`] until it stops yielding.
pub struct RebuildTask {
    generation: u64,
    targets: Option<HashSet<ChunkKey>>,
    options: RebuildOptions,
    cursor: usize,
    staging: Staging,
    stats: RebuildStats,
    started: Instant,
    state: TaskState,
}

impl RebuildTask {
    pub(crate) fn new(
        generation: u64,
        targets: Option<HashSet<ChunkKey>>,
        options: RebuildOptions,
    ) -> Self {
        Self {
            generation,
            targets,
            options,
            cursor: 0,
            staging: Staging::default(),
            stats: RebuildStats::default(),
            started: Instant::now(),
            state: TaskState::Running,
        }
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_finished(&self) -> bool {
        !matches!(self.state, TaskState::Running)
    }

    fn wants(&self, key: ChunkKey) -> bool {
        self.targets.as_ref().is_none_or(|t| t.contains(&key))
    }

    fn abandon(&mut self, current: u64) -> RebuildPoll {
        log::debug!(
            "rebuild abandoned generation={} current={} at={}",
            self.generation,
            current,
            self.cursor
        );
        self.state = TaskState::Abandoned;
        self.staging = Staging::default();
        RebuildPoll::Abandoned
    }

    /// Processes blocks until the time slice runs out or the rebuild finishes.
    ///
    /// Returns [`RebuildPoll::Abandoned`] once a newer rebuild was started on `builder` or
    /// its pending builds were cancelled. Nothing is committed in that case.
    pub fn resume<R, S>(&mut self, builder: &mut ChunkMeshBuilder<R>, source: &S) -> RebuildPoll
    where
        R: BlockRenderer,
        S: BlockSource + ?Sized,
    {
        match &self.state {
            TaskState::Done(stats) => return RebuildPoll::Complete(stats.clone()),
            TaskState::Abandoned => return RebuildPoll::Abandoned,
            TaskState::Running => {}
        }
        if builder.generation() != self.generation {
            return self.abandon(builder.generation());
        }
        builder.sync_state_cache(source);

        let slice_start = Instant::now();
        let chunk_size = builder.chunk_size();
        let blocks = source.blocks();
        let total = blocks.len();
        while self.cursor < total {
            let block = &blocks[self.cursor];
            self.cursor += 1;
            if self.wants(ChunkKey::new(ChunkCoord::of(block.pos, chunk_size))) {
                builder.mesh_block(source, block, &mut self.staging, &mut self.stats);
            }
            if self.cursor < total && slice_start.elapsed() >= self.options.time_slice {
                if let Some(cb) = self.options.on_progress.as_mut() {
                    cb(self.cursor, total);
                }
                return RebuildPoll::Yielded {
                    completed: self.cursor,
                    total,
                };
            }
        }

        if builder.generation() != self.generation {
            return self.abandon(builder.generation());
        }
        let staging = std::mem::take(&mut self.staging);
        let mut stats = std::mem::take(&mut self.stats);
        stats.chunks = builder.commit(self.targets.as_ref(), staging);
        stats.ms = self.started.elapsed().as_millis() as u32;
        if let Some(cb) = self.options.on_progress.as_mut() {
            cb(total, total);
        }
        log_rebuild_perf(&stats, self.targets.as_ref().map(HashSet::len));
        self.state = TaskState::Done(stats.clone());
        RebuildPoll::Complete(stats)
    }
}

fn log_rebuild_perf(stats: &RebuildStats, targets: Option<usize>) {
    log::info!(
        target: "perf",
        "ms={} rebuild blocks={} meshed={} occluded={} empty={} skipped={} chunks={} lights={} targets={:?}",
        stats.ms,
        stats.blocks,
        stats.meshed,
        stats.occluded,
        stats.empty,
        stats.skipped,
        stats.chunks,
        stats.lights,
        targets
    );
}
