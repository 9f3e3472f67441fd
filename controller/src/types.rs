/*!
Math aliases and plain data exchanged between the controller and its collaborators.

Conventions
- Y is up.
- A transform's local forward axis is `+Z` and its local right axis is `+X`.
- Distances are meters, angles are degrees unless a name says otherwise.
*/

use nalgebra as na;
use serde::{Deserialize, Serialize};

pub type Vec2 = na::Vector2<f32>;
pub type Vec3 = na::Vector3<f32>;
pub type Quat = na::UnitQuaternion<f32>;

/// World up.
#[inline]
pub fn up() -> Vec3 {
    Vec3::y()
}

/// Local forward axis of `rotation` in world space.
#[inline]
pub fn forward_of(rotation: &Quat) -> Vec3 {
    rotation * Vec3::z()
}

/// Local right axis of `rotation` in world space.
#[inline]
pub fn right_of(rotation: &Quat) -> Vec3 {
    rotation * Vec3::x()
}

/// Bitmask of collision layers a query is allowed to hit.
///
/// Each static collider carries exactly one layer bit; a query hits it when the
/// query mask has that bit set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);
    pub const ALL: LayerMask = LayerMask(u32::MAX);

    /// Number of distinct layers a mask can hold.
    pub const LAYER_COUNT: u8 = 32;

    /// Mask containing only `layer`, or `None` when `layer >= LAYER_COUNT`.
    #[inline]
    pub const fn try_layer(layer: u8) -> Option<Self> {
        match 1u32.checked_shl(layer as u32) {
            Some(bit) => Some(LayerMask(bit)),
            None => None,
        }
    }

    /// Mask containing only `layer`.
    ///
    /// # Panics
    /// If `layer >= LAYER_COUNT`. Use [`LayerMask::try_layer`] for untrusted input.
    #[inline]
    pub const fn layer(layer: u8) -> Self {
        assert!(layer < Self::LAYER_COUNT, "collision layer out of range");
        LayerMask(1u32 << layer)
    }

    #[inline]
    pub const fn intersects(self, other: LayerMask) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub const fn with(self, other: LayerMask) -> Self {
        LayerMask(self.0 | other.0)
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        LayerMask::ALL
    }
}

/// A single query hit against the collision world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// World-space contact point.
    pub point: Vec3,
    /// Travel distance along the cast direction at which the hit occurred.
    pub distance: f32,
}
