//! Per-part transform update.
//!
//! Rotations compose right to left: slot orientation, then spin about the
//! local up axis, then sag, then the parent's frame. Each part is offset from
//! its parent along its *own* new up axis, which is what bends the branches.

use glam::{Quat, Vec3};
use std::f32::consts::FRAC_PI_4;

use crate::matrix::PackedMatrix;
use crate::part::PartRecord;

/// Cross products shorter than this count as "no sag axis".
pub const SAG_AXIS_EPSILON: f32 = 1e-6;

/// Distance between a part and its parent, in units of the part's scale.
pub const PARENT_OFFSET: f32 = 1.5;

/// Pose of the hierarchy's root as supplied by the host each frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RootPose {
    pub position: Vec3,
    pub rotation: Quat,
    /// Uniform object scale; level `k` is drawn at `scale * 0.5^k`.
    pub scale: f32,
}

impl RootPose {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: 1.0,
    };
}

impl Default for RootPose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Rotation that leans a part toward world down.
///
/// `up_axis` is the part's up direction in the parent's frame before sag.
/// The sag axis is `Y × up_axis`; its length scales the droop. When the
/// length is (numerically) zero the axis is undefined and the parent's
/// rotation is returned unchanged.
pub fn sag_base_rotation(parent_rotation: Quat, up_axis: Vec3, max_sag_angle: f32) -> Quat {
    let sag_axis = Vec3::Y.cross(up_axis);
    let sag_magnitude = sag_axis.length();
    if sag_magnitude <= SAG_AXIS_EPSILON {
        return parent_rotation;
    }
    let sag_rotation = Quat::from_axis_angle(
        sag_axis / sag_magnitude,
        max_sag_angle * FRAC_PI_4 * sag_magnitude,
    );
    sag_rotation * parent_rotation
}

/// Advances `part` by `delta_time` under `parent` and returns its matrix.
///
/// `parent` must already hold this tick's world state. `scale` is the
/// uniform scale of `part`'s level.
#[inline]
pub fn update_part(
    parent: &PartRecord,
    part: &mut PartRecord,
    delta_time: f32,
    scale: f32,
) -> PackedMatrix {
    part.spin_angle += part.spin_velocity * delta_time;

    let up_axis = parent.world_rotation * part.local_rotation * Vec3::Y;
    let base_rotation = sag_base_rotation(parent.world_rotation, up_axis, part.max_sag_angle);

    part.world_rotation =
        base_rotation * (part.local_rotation * Quat::from_rotation_y(part.spin_angle));
    part.world_position =
        parent.world_position + part.world_rotation * Vec3::new(0.0, PARENT_OFFSET * scale, 0.0);

    PackedMatrix::from_rotation_scale_translation(part.world_rotation, scale, part.world_position)
}

/// Updates the root directly from the host pose.
///
/// The root spins like every other part but has no sag and no offset: it
/// sits at the pose's position, in the pose's frame.
pub fn update_root(root: &mut PartRecord, delta_time: f32, pose: &RootPose) -> PackedMatrix {
    root.spin_angle += root.spin_velocity * delta_time;
    root.world_rotation =
        pose.rotation * (root.local_rotation * Quat::from_rotation_y(root.spin_angle));
    root.world_position = pose.position;
    PackedMatrix::from_rotation_scale_translation(
        root.world_rotation,
        pose.scale,
        root.world_position,
    )
}
