use rand::Rng;
use tracing::{debug, info, warn};

use crate::builder::HierarchyBuilder;
use crate::config::FractalConfig;
use crate::error::FractalResult;
use crate::kernel::RootPose;
use crate::level_store::LevelStore;
use crate::matrix::PackedMatrix;
use crate::render_sync::{RenderBackend, RenderBufferSync};
use crate::scheduler::LevelScheduler;

/// Everything that exists only while a fractal is active.
#[derive(Debug)]
struct ActiveFractal {
    cfg: FractalConfig,
    store: LevelStore,
    scheduler: LevelScheduler,
}

/// Host-facing handle of one animated fractal.
///
/// A fractal is either inactive (no arrays at all) or active with a
/// complete hierarchy. Arrays are created by [`Fractal::activate`] and
/// dropped by [`Fractal::deactivate`]; there is no in-between state.
///
/// The typical frame is:
/// 1. [`Fractal::tick`] with the frame's elapsed time and root pose.
/// 2. [`Fractal::render`] to hand the matrices to the renderer.
#[derive(Debug, Default)]
pub struct Fractal {
    active: Option<ActiveFractal>,
}

impl Fractal {
    /// Creates an inactive fractal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the hierarchy and its scheduler.
    ///
    /// Any previous hierarchy is dropped first, so a failed activation
    /// always leaves the fractal inactive.
    ///
    /// ### Errors
    /// Configuration errors from [`FractalConfig::validate`] and pool
    /// creation errors from [`LevelScheduler::new`].
    pub fn activate(&mut self, cfg: FractalConfig, rng: &mut impl Rng) -> FractalResult<()> {
        self.deactivate();

        let built = HierarchyBuilder::new(&cfg)
            .and_then(|builder| builder.build(rng))
            .and_then(|store| Ok((store, LevelScheduler::new(cfg.threads)?)));
        let (store, scheduler) = match built {
            Ok(parts) => parts,
            Err(err) => {
                warn!(%err, "fractal activation rejected");
                return Err(err);
            }
        };

        info!(
            depth = store.depth(),
            parts = store.part_count(),
            threads = scheduler.threads(),
            "fractal activated"
        );
        self.active = Some(ActiveFractal {
            cfg,
            store,
            scheduler,
        });
        Ok(())
    }

    /// Releases every level array. Does nothing when already inactive.
    pub fn deactivate(&mut self) {
        if let Some(active) = self.active.take() {
            info!(depth = active.store.depth(), "fractal deactivated");
        }
    }

    /// Same as [`Fractal::deactivate`] followed by [`Fractal::activate`].
    pub fn reconfigure(&mut self, cfg: FractalConfig, rng: &mut impl Rng) -> FractalResult<()> {
        self.deactivate();
        self.activate(cfg, rng)
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Depth of the active hierarchy.
    pub fn depth(&self) -> Option<usize> {
        self.active.as_ref().map(|a| a.store.depth())
    }

    /// Length of every level, or an empty list when inactive.
    pub fn level_lengths(&self) -> Vec<usize> {
        self.active
            .as_ref()
            .map(|a| a.store.level_lengths())
            .unwrap_or_default()
    }

    pub fn levels(&self) -> Option<&LevelStore> {
        self.active.as_ref().map(|a| &a.store)
    }

    pub fn config(&self) -> Option<&FractalConfig> {
        self.active.as_ref().map(|a| &a.cfg)
    }

    /// Advances the whole hierarchy by `delta_time` seconds.
    ///
    /// Negative or non-finite elapsed times are treated as zero. Returns
    /// every level's matrices, root first, or `None` when inactive.
    pub fn tick(&mut self, delta_time: f32, pose: &RootPose) -> Option<Vec<&[PackedMatrix]>> {
        let active = self.active.as_mut()?;
        let delta_time = if delta_time.is_finite() && delta_time > 0.0 {
            delta_time
        } else {
            0.0
        };
        debug!(delta_time, scale = pose.scale, "fractal tick");
        active.scheduler.update(&mut active.store, delta_time, pose);
        Some(active.store.all_matrices())
    }

    /// Pushes the latest matrices to `backend`; inactive fractals draw nothing.
    pub fn render(&self, pose: &RootPose, backend: &mut impl RenderBackend) {
        if let Some(active) = &self.active {
            RenderBufferSync::sync(&active.cfg, &active.store, pose, backend);
        }
    }
}
