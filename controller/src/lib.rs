pub mod animation;
pub mod bitmask_flags;
pub mod body;
pub mod camera;
pub mod config;
pub mod constants;
pub mod coordinator;
pub mod error;
pub mod input;
pub mod locomotion;
pub mod motion;
pub mod physics;
pub mod quantize;
pub mod rapier_world;
pub mod types;

// Re-export Rapier so hosts can build statics without depending on `rapier3d` directly.
pub use rapier3d;

pub use animation::{
    AnimFlag, AnimationCoordinator, AnimationEngine, BlendAxis, StateAnimator, StateTable,
};
pub use body::KinematicBody;
pub use camera::FollowCamera;
pub use config::{
    AnimationSettings, BodySettings, CameraSettings, ControllerConfig, GroundProbeSettings,
    LocomotionSettings,
};
pub use coordinator::CharacterCoordinator;
pub use error::{ConfigError, WorldError};
pub use input::InputState;
pub use locomotion::{LocomotionController, LocomotionInput};
pub use physics::{CharacterBody, CollisionWorld, EmptyWorld};
pub use rapier_world::{ColliderShapeDef, RapierQueryWorld, WorldStaticDef};
pub use types::{LayerMask, Quat, RayHit, Vec2, Vec3};
