//! Velocity-integrated kinematic body.
//!
//! Implements [`CharacterBody`] for hosts that don't bring their own rigid body. Forces
//! accumulate between steps and are cleared after each integration.

use rapier3d::{
    control::{CharacterLength, KinematicCharacterController},
    na::{Isometry3, Translation3, UnitQuaternion, Vector3},
    prelude::*,
};

use crate::{
    config::BodySettings,
    physics::CharacterBody,
    rapier_world::RapierQueryWorld,
    types::{Quat, Vec3, up},
};

#[derive(Debug, Clone)]
pub struct KinematicBody {
    position: Vec3,
    rotation: Quat,
    velocity: Vec3,
    force: Vec3,
    settings: BodySettings,
}

impl KinematicBody {
    pub fn new(position: Vec3, settings: BodySettings) -> Self {
        Self {
            position,
            rotation: Quat::identity(),
            velocity: Vec3::zeros(),
            force: Vec3::zeros(),
            settings,
        }
    }

    /// Force accumulated since the last step.
    pub fn pending_force(&self) -> Vec3 {
        self.force
    }

    pub fn settings(&self) -> &BodySettings {
        &self.settings
    }

    /// Capsule center for the current feet position.
    pub fn capsule_center(&self) -> Vec3 {
        self.position + up() * (self.settings.capsule_half_height + self.settings.capsule_radius)
    }

    /// Integrate forces and velocity without collision.
    pub fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        self.integrate_velocity(dt);
        self.position += self.velocity * dt;
    }

    /// Integrate, then sweep the capsule through `world` so it slides along statics.
    ///
    /// Landing on a surface stops downward velocity.
    pub fn step_in_world(&mut self, world: &RapierQueryWorld, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        self.integrate_velocity(dt);

        let kcc = KinematicCharacterController {
            autostep: None,
            snap_to_ground: None,
            offset: CharacterLength::Absolute(0.01),
            ..KinematicCharacterController::default()
        };

        let center = self.capsule_center();
        let pose = Isometry3::from_parts(
            Translation3::new(center.x, center.y, center.z),
            UnitQuaternion::identity(),
        );
        let desired = self.velocity * dt;
        let pipeline = world.query_pipeline(QueryFilter::only_fixed());

        let movement = kcc.move_shape(
            dt,
            &pipeline,
            &Capsule::new_y(
                self.settings.capsule_half_height,
                self.settings.capsule_radius,
            ),
            &pose,
            Vector3::new(desired.x, desired.y, desired.z),
            |_| {},
        );

        self.position += Vec3::new(
            movement.translation.x,
            movement.translation.y,
            movement.translation.z,
        );

        if movement.grounded && self.velocity.y < 0.0 {
            self.velocity.y = 0.0;
        }
    }

    fn integrate_velocity(&mut self, dt: f32) {
        let accel = self.force / self.settings.mass + up() * self.settings.gravity;
        self.velocity += accel * dt;
        self.force = Vec3::zeros();
    }
}

impl CharacterBody for KinematicBody {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn rotation(&self) -> Quat {
        self.rotation
    }

    fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    fn add_force(&mut self, force: Vec3) {
        self.force += force;
    }
}
