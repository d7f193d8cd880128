//! Hand-off of computed matrices to an instanced renderer.

use glam::{Vec3, Vec4};

use crate::config::FractalConfig;
use crate::kernel::RootPose;
use crate::level_store::LevelStore;
use crate::matrix::PackedMatrix;
use crate::types::LevelIndex;

/// Which mesh a level is drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeshKind {
    Branch,
    /// Deepest level only.
    Leaf,
}

/// Per-level shading parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelMaterial {
    pub color_a: Vec4,
    pub color_b: Vec4,
    /// Random seed for per-instance color variation.
    pub sequence_numbers: Vec4,
}

/// Axis-aligned bounding volume handed to the renderer for culling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub center: Vec3,
    pub half_extents: Vec3,
}

impl Bounds {
    /// Bounds of the whole structure: `3 * scale` around the root position.
    pub fn around_root(pose: &RootPose) -> Self {
        Self {
            center: pose.position,
            half_extents: Vec3::splat(3.0 * pose.scale),
        }
    }
}

/// One instanced draw request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InstancedDraw {
    pub level: LevelIndex,
    pub mesh: MeshKind,
    pub material: LevelMaterial,
    pub bounds: Bounds,
    pub instance_count: usize,
}

/// Rendering back-end fed by [`RenderBufferSync`].
///
/// For every level, `upload_instances` is called before the matching
/// `draw_instanced`.
pub trait RenderBackend {
    /// Copies `matrices` into the instance buffer of `level`.
    fn upload_instances(&mut self, level: LevelIndex, matrices: &[PackedMatrix]);

    /// Issues one instanced draw over the buffer uploaded for `draw.level`.
    fn draw_instanced(&mut self, draw: &InstancedDraw);
}

/// Chooses mesh and material per level and pushes everything to a backend.
pub struct RenderBufferSync;

impl RenderBufferSync {
    /// Material for `level` out of `depth` levels.
    ///
    /// Non-leaf levels sample both gradients at `level / (depth - 2)`, so the
    /// last branch level sits at the end of the gradients. The leaf level
    /// uses the fixed leaf colors.
    pub fn level_material(
        cfg: &FractalConfig,
        store: &LevelStore,
        level: LevelIndex,
    ) -> (MeshKind, LevelMaterial) {
        let depth = store.depth();
        let leaf = level + 1 == depth;
        let (mesh, color_a, color_b) = if leaf {
            (MeshKind::Leaf, cfg.leaf_color_a, cfg.leaf_color_b)
        } else {
            let t = if depth > 2 {
                level as f32 / (depth - 2) as f32
            } else {
                0.0
            };
            (
                MeshKind::Branch,
                cfg.gradient_a.evaluate(t),
                cfg.gradient_b.evaluate(t),
            )
        };
        (
            mesh,
            LevelMaterial {
                color_a,
                color_b,
                sequence_numbers: store.sequence_numbers(level),
            },
        )
    }

    /// Uploads every level and requests one draw per level, root first.
    ///
    /// Must run after the scheduler's final join; taking `&LevelStore`
    /// guarantees no update is in flight.
    pub fn sync(
        cfg: &FractalConfig,
        store: &LevelStore,
        pose: &RootPose,
        backend: &mut impl RenderBackend,
    ) {
        let bounds = Bounds::around_root(pose);
        for level in 0..store.depth() {
            let matrices = store.matrices(level);
            backend.upload_instances(level, matrices);

            let (mesh, material) = Self::level_material(cfg, store, level);
            backend.draw_instanced(&InstancedDraw {
                level,
                mesh,
                material,
                bounds,
                instance_count: matrices.len(),
            });
        }
    }
}
