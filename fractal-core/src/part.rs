use glam::{Quat, Vec3};
use std::f32::consts::FRAC_PI_2;

use crate::types::SLOT_COUNT;

/// State of one node in the hierarchy.
///
/// `local_rotation`, `spin_velocity` and `max_sag_angle` are fixed when the
/// hierarchy is built. Only `world_position`, `world_rotation` and
/// `spin_angle` change from tick to tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PartRecord {
    /// Orientation of the slot this part occupies under its parent.
    pub local_rotation: Quat,
    pub world_position: Vec3,
    pub world_rotation: Quat,
    /// Accumulated spin about the local up axis, in radians. Never wrapped.
    pub spin_angle: f32,
    /// Signed spin speed in radians per second.
    pub spin_velocity: f32,
    /// Upper bound of the gravity droop, in radians.
    pub max_sag_angle: f32,
}

impl PartRecord {
    /// Creates a part at rest in the given slot.
    pub fn new(slot: usize, spin_velocity: f32, max_sag_angle: f32) -> Self {
        Self {
            local_rotation: slot_rotation(slot),
            world_position: Vec3::ZERO,
            world_rotation: Quat::IDENTITY,
            spin_angle: 0.0,
            spin_velocity,
            max_sag_angle,
        }
    }
}

impl Default for PartRecord {
    fn default() -> Self {
        Self::new(0, 0.0, 0.0)
    }
}

/// Canonical orientation of child slot `slot` (taken modulo [`SLOT_COUNT`]).
///
/// Slot 0 keeps the parent's up axis, slots 1 and 2 tip over to +X / -X and
/// slots 3 and 4 tip over to +Z / -Z.
pub fn slot_rotation(slot: usize) -> Quat {
    match slot % SLOT_COUNT {
        0 => Quat::IDENTITY,
        1 => Quat::from_rotation_z(-FRAC_PI_2),
        2 => Quat::from_rotation_z(FRAC_PI_2),
        3 => Quat::from_rotation_x(FRAC_PI_2),
        _ => Quat::from_rotation_x(-FRAC_PI_2),
    }
}
