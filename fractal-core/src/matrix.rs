use glam::{Mat3, Quat, Vec3};

/// A 3×4 transform as consumed by instanced rendering.
///
/// Stored column-major: three rotation·scale columns followed by the
/// translation, 12 floats and a 48-byte stride with no padding.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PackedMatrix {
    pub x_axis: Vec3,
    pub y_axis: Vec3,
    pub z_axis: Vec3,
    pub translation: Vec3,
}

impl PackedMatrix {
    pub const IDENTITY: Self = Self {
        x_axis: Vec3::X,
        y_axis: Vec3::Y,
        z_axis: Vec3::Z,
        translation: Vec3::ZERO,
    };

    /// Packs `rotation` scaled uniformly by `scale`, then translated.
    #[inline]
    pub fn from_rotation_scale_translation(rotation: Quat, scale: f32, translation: Vec3) -> Self {
        let m = Mat3::from_quat(rotation) * scale;
        Self {
            x_axis: m.x_axis,
            y_axis: m.y_axis,
            z_axis: m.z_axis,
            translation,
        }
    }

    /// Flat column-major layout for upload into an instance buffer.
    pub fn to_cols_array(&self) -> [f32; 12] {
        [
            self.x_axis.x,
            self.x_axis.y,
            self.x_axis.z,
            self.y_axis.x,
            self.y_axis.y,
            self.y_axis.z,
            self.z_axis.x,
            self.z_axis.y,
            self.z_axis.z,
            self.translation.x,
            self.translation.y,
            self.translation.z,
        ]
    }

    /// Uniform scale encoded in the matrix (length of the first column).
    pub fn uniform_scale(&self) -> f32 {
        self.x_axis.length()
    }

    pub fn transform_point3(&self, p: Vec3) -> Vec3 {
        self.x_axis * p.x + self.y_axis * p.y + self.z_axis * p.z + self.translation
    }
}
