//! Fixed tuning values that are part of the controller's behaviour rather than its
//! per-character configuration. Tunable values live in [`crate::config`].

/// Damp window (seconds) the animation engine uses to ease a blend axis toward its target.
pub const BLEND_DAMP_TIME_S: f32 = 0.1;

/// Cross-fade duration (seconds) for every one-shot animation request.
pub const ONE_SHOT_CROSS_FADE_S: f32 = 0.2;

/// Intent magnitude at which a snapped blend axis switches from half to full.
pub const SNAP_FULL_THRESHOLD: f32 = 0.55;

/// Vertical blend value reserved for the sprint cycle.
pub const SPRINT_BLEND_VALUE: f32 = 2.0;

/// Move amount at (or above) which the character runs instead of walks.
pub const RUN_MOVE_AMOUNT: f32 = 0.5;

/// Move amount that must be exceeded before a held sprint input counts.
pub const SPRINT_MOVE_AMOUNT: f32 = 0.5;

/// Time window (seconds) used to ease the character onto the ground while moving.
///
/// The per-frame interpolation factor is `dt / GROUND_EASE_WINDOW_S`.
pub const GROUND_EASE_WINDOW_S: f32 = 0.1;

/// Per-frame interpolation factor for the camera's local distance.
pub const CAMERA_DISTANCE_LERP: f32 = 0.2;

/// Guard for normalizing direction vectors (meters).
pub const DIR_EPS: f32 = 1.0e-6;

/// Clip names the locomotion controller requests.
pub mod clips {
    pub const FALLING: &str = "Falling";
    pub const LAND: &str = "Land";
    pub const JUMP: &str = "Jump";
    pub const EMPTY: &str = "Empty";
}
