//! Pure motion math shared by the locomotion controller and the follow camera.
//!
//! Nothing here touches collaborators; every function maps numbers to numbers so the
//! controller's behaviour can be pinned down in isolation.

use crate::{
    config::LocomotionSettings,
    constants::{DIR_EPS, RUN_MOVE_AMOUNT},
    types::{Quat, Vec3, up},
};

/// Combined stick deflection in `[0, 1]`: `clamp01(|strafe| + |forward|)`.
///
/// NaN inputs count as no deflection.
#[inline]
pub fn move_amount(strafe: f32, forward: f32) -> f32 {
    let sum = strafe.abs() + forward.abs();
    if sum.is_nan() { 0.0 } else { sum.clamp(0.0, 1.0) }
}

/// Camera-relative movement direction for a stick intent.
///
/// The combined vector is normalized *before* its vertical component is dropped, so a
/// pitched camera yields a horizontal direction shorter than one. Zero intent yields zero.
#[inline]
pub fn planar_move_direction(
    camera_forward: Vec3,
    camera_right: Vec3,
    strafe: f32,
    forward: f32,
) -> Vec3 {
    let combined = camera_forward * forward + camera_right * strafe;
    let mut dir = combined.try_normalize(DIR_EPS).unwrap_or_else(Vec3::zeros);
    dir.y = 0.0;
    dir
}

/// Ground speed for the current gait.
#[inline]
pub fn select_speed(settings: &LocomotionSettings, sprinting: bool, move_amount: f32) -> f32 {
    if sprinting {
        settings.sprinting_speed
    } else if move_amount >= RUN_MOVE_AMOUNT {
        settings.running_speed
    } else {
        settings.walking_speed
    }
}

/// Initial vertical speed that reaches `jump_height` under `gravity` (negative).
///
/// `v = sqrt(-2 * g * h)`. Inputs outside `g < 0, h >= 0` collapse to zero rather than NaN.
#[inline]
pub fn jump_launch_speed(gravity: f32, jump_height: f32) -> f32 {
    (-2.0 * gravity * jump_height).max(0.0).sqrt()
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}


/// Critically damped spring toward `target`.
///
/// Closed-form approximation of a spring with `smooth_time` as the time to roughly reach
/// the target. `velocity` carries state between calls and must be kept by the caller.
/// The result never overshoots the target.
pub fn smooth_damp(
    current: Vec3,
    target: Vec3,
    velocity: &mut Vec3,
    smooth_time: f32,
    dt: f32,
) -> Vec3 {
    if dt <= 0.0 {
        return current;
    }

    let smooth_time = smooth_time.max(1.0e-4);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + change * omega) * dt;
    *velocity = (*velocity - temp * omega) * decay;
    let mut output = target + (change + temp) * decay;

    // Clamp overshoot: if we crossed the target this step, stop on it.
    let to_target = target - current;
    let past_target = output - target;
    if to_target.dot(&past_target) > 0.0 {
        output = target;
        *velocity = (output - target) / dt;
    }

    output
}

/// Yaw-only rotation whose forward axis points along `dir` (projected on the ground plane).
///
/// Returns `None` for a (near) vertical or zero direction.
#[inline]
pub fn look_rotation(dir: Vec3) -> Option<Quat> {
    let planar = Vec3::new(dir.x, 0.0, dir.z);
    if planar.norm_squared() <= DIR_EPS * DIR_EPS {
        return None;
    }
    Some(Quat::face_towards(&planar, &up()))
}

/// Spherical interpolation from `current` toward `target` by `t` in `[0, 1]`, along the
/// shorter arc.
pub fn turn_towards(current: &Quat, target: &Quat, t: f32) -> Quat {
    current.slerp(target, t.clamp(0.0, 1.0))
}
