use crate::constants::{SNAP_FULL_THRESHOLD, SPRINT_BLEND_VALUE};

/// Quantize one locomotion intent axis to the blend values the clips are authored for.
///
/// - `(0, 0.55)` → `0.5`
/// - `>= 0.55` → `1.0`
/// - `<= -0.55` → `-1.0`
/// - anything else, including `(-0.55, 0)` and NaN → `0.0`
///
/// There is no negative half step: small backward intents snap to idle.
pub fn snap_blend_axis(intent: f32) -> f32 {
    if intent > 0.0 && intent < SNAP_FULL_THRESHOLD {
        0.5
    } else if intent >= SNAP_FULL_THRESHOLD {
        1.0
    } else if intent <= -SNAP_FULL_THRESHOLD {
        -1.0
    } else {
        0.0
    }
}

/// Blend targets `(horizontal, vertical)` for a locomotion intent.
///
/// With snapping enabled and `sprinting`, the strafe axis keeps its raw value and the
/// forward axis is pinned to the sprint marker.
pub fn locomotion_blend_targets(
    strafe: f32,
    forward: f32,
    sprinting: bool,
    snap: bool,
) -> (f32, f32) {
    if !snap {
        return (strafe, forward);
    }

    if sprinting {
        return (strafe, SPRINT_BLEND_VALUE);
    }

    (snap_blend_axis(strafe), snap_blend_axis(forward))
}
