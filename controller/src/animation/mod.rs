//! Animation parameters the controller drives, and the engine interface it drives them through.

mod animator;
mod coordinator;

pub use animator::{FlagTransition, FlagWrite, StateAnimator, StateDef, StateTable};
pub use coordinator::AnimationCoordinator;

use serde::{Deserialize, Serialize};

use crate::bitmask_flags::FlagBitmask;

/// Continuous blend-tree parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlendAxis {
    Horizontal,
    Vertical,
}

/// Boolean animator parameters shared between the controller and the state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum AnimFlag {
    /// A one-shot owns the character; movement and rotation are suspended.
    IsInteracting = 0,
    IsJumping = 1,
    IsGrounded = 2,
}

impl FlagBitmask for AnimFlag {
    type Storage = u8;

    fn bit_index(&self) -> u8 {
        *self as u8
    }
}

/// The host animation state machine.
pub trait AnimationEngine {
    /// Ease `axis` toward `value`, reaching it roughly after `damp_time` seconds.
    fn set_blend_target(&mut self, axis: BlendAxis, value: f32, damp_time: f32, dt: f32);

    fn set_flag(&mut self, flag: AnimFlag, value: bool);

    fn flag(&self, flag: AnimFlag) -> bool;

    /// Fire-and-forget transition to `clip` over `duration` seconds. The latest request wins.
    fn cross_fade(&mut self, clip: &str, duration: f32);
}
