//! Conversions between controller space and Bevy space.
//!
//! The controller treats `+Z` as forward and `+X` as right. Bevy is right-handed with
//! `-Z` forward, so seen from behind a character facing `+Z`, screen right is `-X`.
//! Mirroring the X axis maps one convention onto the other without touching Y or Z.

use bevy::prelude::*;

pub fn to_bevy(v: controller::Vec3) -> Vec3 {
    Vec3::new(-v.x, v.y, v.z)
}

/// Rotation mirrored across the YZ plane.
pub fn to_bevy_rotation(q: controller::Quat) -> Quat {
    Quat::from_xyzw(q.i, -q.j, -q.k, q.w)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_mirror_across_x() {
        let p = controller::Vec3::new(1.5, -2.0, 3.25);
        assert_eq!(to_bevy(p), Vec3::new(-1.5, -2.0, 3.25));
    }

    #[test]
    fn mirrored_rotation_maps_forward_axis() {
        let yaw = controller::Quat::from_axis_angle(&controller::Vec3::y_axis(), 0.7);
        let forward = yaw * controller::Vec3::z();

        let mirrored = to_bevy_rotation(yaw) * Vec3::Z;
        assert!(mirrored.abs_diff_eq(to_bevy(forward), 1.0e-5));
    }
}
