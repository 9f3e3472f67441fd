//! Interfaces the controller needs from the host physics engine.

use crate::types::{LayerMask, Quat, RayHit, Vec3};

/// Scene queries against the collision world.
///
/// A `None` result is the normal "nothing there" outcome, not a failure.
pub trait CollisionWorld {
    /// Cast a ray straight down from `origin`.
    fn cast_down(&self, origin: Vec3, max_distance: f32, layers: LayerMask) -> Option<RayHit>;

    /// Sweep a sphere of `radius` from `origin` along `direction` (unit length).
    fn cast_sphere(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
        layers: LayerMask,
    ) -> Option<RayHit>;
}

/// The rigid body carrying the controlled character.
///
/// `position` is the character's feet. The host integrates velocity and forces after
/// the locomotion phase.
pub trait CharacterBody {
    fn position(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);

    fn rotation(&self) -> Quat;
    fn set_rotation(&mut self, rotation: Quat);

    fn velocity(&self) -> Vec3;
    fn set_velocity(&mut self, velocity: Vec3);

    /// Accumulate a continuous force for the next integration step.
    fn add_force(&mut self, force: Vec3);
}

/// A world with nothing in it.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmptyWorld;

impl CollisionWorld for EmptyWorld {
    fn cast_down(&self, _origin: Vec3, _max_distance: f32, _layers: LayerMask) -> Option<RayHit> {
        None
    }

    fn cast_sphere(
        &self,
        _origin: Vec3,
        _radius: f32,
        _direction: Vec3,
        _max_distance: f32,
        _layers: LayerMask,
    ) -> Option<RayHit> {
        None
    }
}
