//! Level-by-level parallel update of a [`LevelStore`].
//!
//! Within a level every part only reads its parent from the previous level,
//! so all parts of a level run in parallel. Levels themselves form a chain:
//! level `k` starts only after level `k - 1` has been fully written.

use rayon::prelude::*;

use crate::error::{FractalError, FractalResult};
use crate::kernel::{self, RootPose};
use crate::level_store::LevelStore;
use crate::types::{SLOT_COUNT, level_scale};

/// Drives [`kernel::update_part`] over every level on a dedicated worker pool.
pub struct LevelScheduler {
    pool: rayon::ThreadPool,
}

impl std::fmt::Debug for LevelScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LevelScheduler")
            .field("threads", &self.pool.current_num_threads())
            .finish()
    }
}

impl LevelScheduler {
    /// Creates a scheduler with `threads` workers, or rayon's default count.
    ///
    /// ### Errors
    /// - [`FractalError::Configuration`] if `threads` is `Some(0)`.
    /// - [`FractalError::Scheduler`] if the pool cannot be built.
    pub fn new(threads: Option<usize>) -> FractalResult<Self> {
        if threads == Some(0) {
            return Err(FractalError::configuration(
                "threads must be >= 1 when set",
            ));
        }

        let mut builder = rayon::ThreadPoolBuilder::new()
            .thread_name(|i| format!("fractal-level-{i}"));
        if let Some(n) = threads {
            builder = builder.num_threads(n);
        }
        let pool = builder.build().map_err(|e| {
            FractalError::scheduler(format!("failed to build rayon thread pool: {e}"))
        })?;
        Ok(Self { pool })
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Recomputes every part of `store` for one tick.
    ///
    /// 1. The root is updated inline from `pose`.
    /// 2. Each following level is split into chunks of [`SLOT_COUNT`]
    ///    siblings; chunk `c` holds the children of parent `c`. Chunks run
    ///    in parallel and the level joins before the next one starts.
    ///
    /// On return every matrix of every level is up to date.
    #[tracing::instrument(level = "debug", skip_all, fields(depth = store.depth()))]
    pub fn update(&self, store: &mut LevelStore, delta_time: f32, pose: &RootPose) {
        let (root, root_matrix) = store.root_mut();
        *root_matrix = kernel::update_root(root, delta_time, pose);

        self.pool.install(|| {
            for level in 1..store.depth() {
                let scale = level_scale(pose.scale, level);
                let (parents, parts, matrices) = store.split_level_mut(level);
                tracing::trace!(level, parts = parts.len(), scale, "dispatching level");

                parts
                    .par_chunks_mut(SLOT_COUNT)
                    .zip(matrices.par_chunks_mut(SLOT_COUNT))
                    .enumerate()
                    .for_each(|(parent_index, (children, out))| {
                        let parent = &parents[parent_index];
                        for (part, matrix) in children.iter_mut().zip(out.iter_mut()) {
                            *matrix = kernel::update_part(parent, part, delta_time, scale);
                        }
                    });
            }
        });
    }
}
