//! Third-person follow camera.
//!
//! The rig follows the character's position with a critically damped spring and carries
//! the yaw. A pivot sits `pivot_height` above the rig and carries the pitch. The camera
//! itself hangs behind the pivot on its local Z axis and is pulled in when something
//! blocks the line from the pivot.

use crate::{
    config::CameraSettings,
    constants::CAMERA_DISTANCE_LERP,
    motion::{lerp, smooth_damp},
    physics::CollisionWorld,
    types::{Quat, Vec2, Vec3, forward_of, right_of, up},
};

#[derive(Debug, Clone)]
pub struct FollowCamera {
    settings: CameraSettings,
    rig_position: Vec3,
    follow_velocity: Vec3,
    /// Degrees, unbounded.
    look_yaw: f32,
    /// Degrees, within `[min_pitch, max_pitch]`.
    pivot_pitch: f32,
    /// Camera Z offset in pivot space; negative is behind the pivot.
    local_z: f32,
}

impl FollowCamera {
    pub fn new(settings: CameraSettings, target: Vec3) -> Self {
        let local_z = -settings.default_distance;
        Self {
            settings,
            rig_position: target,
            follow_velocity: Vec3::zeros(),
            look_yaw: 0.0,
            pivot_pitch: 0.0,
            local_z,
        }
    }

    /// Follow `target`, apply the look delta, then resolve occlusion.
    pub fn advance<W>(&mut self, world: &W, camera_delta: Vec2, target: Vec3, dt: f32)
    where
        W: CollisionWorld + ?Sized,
    {
        self.follow(target, dt);
        self.rotate(camera_delta);
        self.handle_collisions(world);
    }

    fn follow(&mut self, target: Vec3, dt: f32) {
        self.rig_position = smooth_damp(
            self.rig_position,
            target,
            &mut self.follow_velocity,
            self.settings.follow_smooth_time,
            dt,
        );
    }

    fn rotate(&mut self, delta: Vec2) {
        self.look_yaw += delta.x * self.settings.look_speed;
        self.pivot_pitch = (self.pivot_pitch - delta.y * self.settings.pivot_speed)
            .clamp(self.settings.min_pitch, self.settings.max_pitch);
    }

    fn handle_collisions<W: CollisionWorld + ?Sized>(&mut self, world: &W) {
        let s = &self.settings;
        let hit = world.cast_sphere(
            self.pivot_position(),
            s.collision_radius,
            -self.forward(),
            s.default_distance,
            s.collision_layers,
        );

        let target = pull_in_target(
            s.default_distance,
            s.collision_offset,
            s.minimum_collision_offset,
            hit.map(|h| h.distance),
        );
        self.local_z = lerp(self.local_z, target, CAMERA_DISTANCE_LERP);
    }

    /// Yaw-only rotation of the rig.
    pub fn rig_rotation(&self) -> Quat {
        Quat::from_axis_angle(&Vec3::y_axis(), self.look_yaw.to_radians())
    }

    /// Full camera rotation: rig yaw, then pivot pitch.
    pub fn rotation(&self) -> Quat {
        self.rig_rotation()
            * Quat::from_axis_angle(&Vec3::x_axis(), self.pivot_pitch.to_radians())
    }

    pub fn forward(&self) -> Vec3 {
        forward_of(&self.rotation())
    }

    pub fn right(&self) -> Vec3 {
        right_of(&self.rotation())
    }

    pub fn rig_position(&self) -> Vec3 {
        self.rig_position
    }

    pub fn pivot_position(&self) -> Vec3 {
        self.rig_position + up() * self.settings.pivot_height
    }

    pub fn position(&self) -> Vec3 {
        self.pivot_position() + self.rotation() * Vec3::new(0.0, 0.0, self.local_z)
    }

    pub fn look_yaw(&self) -> f32 {
        self.look_yaw
    }

    pub fn pivot_pitch(&self) -> f32 {
        self.pivot_pitch
    }

    /// Current distance behind the pivot.
    pub fn distance(&self) -> f32 {
        -self.local_z
    }
}

/// Local Z the camera should ease toward for an optional obstruction `hit_distance`.
///
/// Unobstructed, the camera rests at `-default_distance`. An obstruction pulls it in to
/// `collision_offset` short of the hit. When that leaves it closer than
/// `minimum_offset`, it is pushed back by `minimum_offset`.
pub fn pull_in_target(
    default_distance: f32,
    collision_offset: f32,
    minimum_offset: f32,
    hit_distance: Option<f32>,
) -> f32 {
    let mut target = match hit_distance {
        Some(d) => -(d - collision_offset),
        None => -default_distance,
    };
    if target.abs() < minimum_offset {
        target -= minimum_offset;
    }
    target
}
