//! Per-frame orchestration of one controlled character.
//!
//! A host drives three phases every frame, in this order:
//! 1. [`CharacterCoordinator::input_phase`] once per rendered frame, after input is decoded.
//! 2. [`CharacterCoordinator::fixed_phase`] zero or more times per frame on the physics clock,
//!    followed by the host's body integration.
//! 3. [`CharacterCoordinator::late_phase`] once per rendered frame, after animation.

use log::debug;

use crate::{
    animation::{AnimFlag, AnimationCoordinator, AnimationEngine, StateAnimator},
    body::KinematicBody,
    camera::FollowCamera,
    config::ControllerConfig,
    error::ConfigError,
    input::InputState,
    locomotion::{LocomotionController, LocomotionInput},
    motion::move_amount,
    physics::{CharacterBody, CollisionWorld},
    types::Vec3,
};

/// Owns every component of the character and the interaction gate.
#[derive(Debug)]
pub struct CharacterCoordinator<A, B> {
    input: InputState,
    animation: AnimationCoordinator<A>,
    locomotion: LocomotionController,
    camera: FollowCamera,
    body: B,
    /// `IsInteracting` as of the last late phase.
    is_interacting: bool,
    move_amount: f32,
}

impl<A, B> CharacterCoordinator<A, B>
where
    A: AnimationEngine,
    B: CharacterBody,
{
    /// Validate `config` and wire the components around the given collaborators.
    pub fn new(config: ControllerConfig, engine: A, body: B) -> Result<Self, ConfigError> {
        config.validate()?;

        let ControllerConfig {
            locomotion,
            ground,
            camera,
            animation,
            ..
        } = config;

        debug!("character controller wired at {:?}", body.position());

        Ok(Self {
            input: InputState::default(),
            animation: AnimationCoordinator::new(engine, animation.snap_movement_animations),
            locomotion: LocomotionController::new(locomotion, ground),
            camera: FollowCamera::new(camera, body.position()),
            body,
            is_interacting: false,
            move_amount: 0.0,
        })
    }

    /// Refresh blend parameters and sprinting, and fire a pending jump.
    pub fn input_phase(&mut self, dt: f32) {
        let sprint = self.input.sprint();
        self.move_amount = move_amount(self.input.strafe(), self.input.forward());

        self.animation
            .update_locomotion_blend(0.0, self.move_amount, sprint, dt);
        self.locomotion.set_sprinting(sprint, self.move_amount);

        if self.input.take_jump() {
            self.locomotion.jump(&mut self.body, &mut self.animation);
        }
    }

    /// Advance locomotion on the physics clock.
    pub fn fixed_phase<W>(&mut self, world: &W, dt: f32)
    where
        W: CollisionWorld + ?Sized,
    {
        let intent = LocomotionInput {
            strafe: self.input.strafe(),
            forward: self.input.forward(),
            move_amount: self.move_amount,
            camera_forward: self.camera.forward(),
            camera_right: self.camera.right(),
            interacting: self.is_interacting,
        };
        self.locomotion
            .advance(world, &mut self.body, &mut self.animation, &intent, dt);
    }

    /// Move the camera, then read flags back from the animation engine.
    pub fn late_phase<W>(&mut self, world: &W, dt: f32)
    where
        W: CollisionWorld + ?Sized,
    {
        self.camera
            .advance(world, self.input.camera_delta(), self.body.position(), dt);

        let interacting = self.animation.flag(AnimFlag::IsInteracting);
        if interacting != self.is_interacting {
            debug!("interaction gate {}", if interacting { "closed" } else { "open" });
        }
        self.is_interacting = interacting;
        self.locomotion
            .set_jumping(self.animation.flag(AnimFlag::IsJumping));
        self.animation
            .set_flag(AnimFlag::IsGrounded, self.locomotion.is_grounded());
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Write access for the input-binding layer.
    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn animation(&self) -> &AnimationCoordinator<A> {
        &self.animation
    }

    pub fn animation_mut(&mut self) -> &mut AnimationCoordinator<A> {
        &mut self.animation
    }

    pub fn locomotion(&self) -> &LocomotionController {
        &self.locomotion
    }

    pub fn camera(&self) -> &FollowCamera {
        &self.camera
    }

    pub fn body(&self) -> &B {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut B {
        &mut self.body
    }

    pub fn is_interacting(&self) -> bool {
        self.is_interacting
    }

    pub fn move_amount(&self) -> f32 {
        self.move_amount
    }
}

impl CharacterCoordinator<StateAnimator, KinematicBody> {
    /// Wire the bundled animator and kinematic body from `config`, feet at `spawn`.
    pub fn with_reference_collaborators(
        config: ControllerConfig,
        spawn: Vec3,
    ) -> Result<Self, ConfigError> {
        let engine = StateAnimator::new(config.states.clone())?;
        let body = KinematicBody::new(spawn, config.body.clone());
        Self::new(config, engine, body)
    }
}
