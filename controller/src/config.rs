//! Per-character tuning with defaults and RON loading.
//!
//! Every struct is `#[serde(default)]`, so a RON file only needs the fields it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{animation::StateTable, error::ConfigError, types::LayerMask};

/// Top-level controller configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ControllerConfig {
    pub locomotion: LocomotionSettings,
    pub ground: GroundProbeSettings,
    pub camera: CameraSettings,
    pub animation: AnimationSettings,
    pub body: BodySettings,
    /// State table for the bundled [`crate::StateAnimator`].
    pub states: StateTable,
}

/// Horizontal and vertical movement tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LocomotionSettings {
    pub walking_speed: f32,
    pub running_speed: f32,
    pub sprinting_speed: f32,
    /// Slerp rate toward the target facing, per second.
    pub rotation_speed: f32,
    /// Apex height of a jump (meters).
    pub jump_height: f32,
    /// Gravity used by the jump equation (m/s², negative).
    pub gravity_intensity: f32,
    /// Downward force per second spent airborne.
    pub falling_speed: f32,
}

impl Default for LocomotionSettings {
    fn default() -> Self {
        Self {
            walking_speed: 1.5,
            running_speed: 5.0,
            sprinting_speed: 7.0,
            rotation_speed: 15.0,
            jump_height: 3.0,
            gravity_intensity: -15.0,
            falling_speed: 33.0,
        }
    }
}

/// Downward grounding probe.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GroundProbeSettings {
    /// Height above the feet the probe starts from.
    pub ray_cast_height_offset: f32,
    /// Travel distance of the probe from its origin.
    pub probe_distance: f32,
    /// Ground closer than this above the feet is stepped onto.
    pub max_climbing_height: f32,
    pub ground_layers: LayerMask,
}

impl Default for GroundProbeSettings {
    fn default() -> Self {
        Self {
            ray_cast_height_offset: 0.5,
            probe_distance: 0.6,
            max_climbing_height: 0.1,
            ground_layers: LayerMask::ALL,
        }
    }
}

/// Follow camera tuning. Angles are degrees.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraSettings {
    /// Smooth time of the rig's positional follow (seconds).
    pub follow_smooth_time: f32,
    /// Degrees of yaw per unit of horizontal camera input.
    pub look_speed: f32,
    /// Degrees of pitch per unit of vertical camera input.
    pub pivot_speed: f32,
    pub min_pitch: f32,
    pub max_pitch: f32,
    /// Height of the pivot above the rig origin.
    pub pivot_height: f32,
    /// Resting distance behind the pivot.
    pub default_distance: f32,
    pub collision_radius: f32,
    /// Gap kept between the camera and an obstruction.
    pub collision_offset: f32,
    /// Minimum distance kept between the camera and the pivot.
    pub minimum_collision_offset: f32,
    pub collision_layers: LayerMask,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            follow_smooth_time: 0.2,
            look_speed: 2.0,
            pivot_speed: 2.0,
            min_pitch: -35.0,
            max_pitch: 35.0,
            pivot_height: 1.6,
            default_distance: 3.0,
            collision_radius: 0.2,
            collision_offset: 0.2,
            minimum_collision_offset: 0.2,
            collision_layers: LayerMask::ALL,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnimationSettings {
    /// Quantize the locomotion blend axes instead of passing raw intent.
    pub snap_movement_animations: bool,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            snap_movement_animations: true,
        }
    }
}

/// Parameters of the bundled [`crate::KinematicBody`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BodySettings {
    pub mass: f32,
    /// Body gravity (m/s²). Zero leaves falling entirely to the airborne force.
    pub gravity: f32,
    pub capsule_radius: f32,
    /// Half length of the capsule's cylinder section.
    pub capsule_half_height: f32,
}

impl Default for BodySettings {
    fn default() -> Self {
        Self {
            mass: 1.0,
            gravity: 0.0,
            capsule_radius: 0.3,
            capsule_half_height: 0.6,
        }
    }
}

impl ControllerConfig {
    /// Parse a RON document.
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        ron::from_str(text).map_err(ConfigError::Parse)
    }

    /// Read and parse a RON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
        Self::from_ron_str(&text)
    }

    /// Reject tunings that would produce NaN or degenerate motion.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let l = &self.locomotion;
        positive("locomotion.walking_speed", l.walking_speed)?;
        positive("locomotion.running_speed", l.running_speed)?;
        positive("locomotion.sprinting_speed", l.sprinting_speed)?;
        positive("locomotion.rotation_speed", l.rotation_speed)?;
        non_negative("locomotion.jump_height", l.jump_height)?;
        non_negative("locomotion.falling_speed", l.falling_speed)?;
        finite("locomotion.gravity_intensity", l.gravity_intensity)?;
        if l.gravity_intensity >= 0.0 {
            return Err(ConfigError::UpwardGravity(l.gravity_intensity));
        }

        let g = &self.ground;
        non_negative("ground.ray_cast_height_offset", g.ray_cast_height_offset)?;
        positive("ground.probe_distance", g.probe_distance)?;
        finite("ground.max_climbing_height", g.max_climbing_height)?;

        let c = &self.camera;
        positive("camera.follow_smooth_time", c.follow_smooth_time)?;
        finite("camera.look_speed", c.look_speed)?;
        finite("camera.pivot_speed", c.pivot_speed)?;
        finite("camera.min_pitch", c.min_pitch)?;
        finite("camera.max_pitch", c.max_pitch)?;
        if c.min_pitch > c.max_pitch {
            return Err(ConfigError::InvertedPitch {
                min: c.min_pitch,
                max: c.max_pitch,
            });
        }
        finite("camera.pivot_height", c.pivot_height)?;
        positive("camera.default_distance", c.default_distance)?;
        non_negative("camera.collision_radius", c.collision_radius)?;
        non_negative("camera.collision_offset", c.collision_offset)?;
        non_negative("camera.minimum_collision_offset", c.minimum_collision_offset)?;

        let b = &self.body;
        positive("body.mass", b.mass)?;
        finite("body.gravity", b.gravity)?;
        positive("body.capsule_radius", b.capsule_radius)?;
        non_negative("body.capsule_half_height", b.capsule_half_height)?;

        self.states.validate()
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotFinite { field, value })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}
