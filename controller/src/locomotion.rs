//! Grounding, falling/landing, planar movement, facing and jumping.
//!
//! The controller owns only its movement flags. The body, the collision world and the
//! animation coordinator are handed in on every call, so nothing here holds a reference
//! to anything else.

use log::{debug, trace};

use crate::{
    animation::{AnimFlag, AnimationCoordinator, AnimationEngine},
    config::{GroundProbeSettings, LocomotionSettings},
    constants::{GROUND_EASE_WINDOW_S, SPRINT_MOVE_AMOUNT, clips},
    motion::{
        jump_launch_speed, look_rotation, planar_move_direction, select_speed, turn_towards,
    },
    physics::{CharacterBody, CollisionWorld},
    types::{Vec3, forward_of, up},
};

/// Per-step inputs the locomotion controller reads but does not own.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocomotionInput {
    pub strafe: f32,
    pub forward: f32,
    pub move_amount: f32,
    /// Camera forward axis, pitch included.
    pub camera_forward: Vec3,
    pub camera_right: Vec3,
    /// Interaction gate as published in the previous late phase.
    pub interacting: bool,
}

#[derive(Debug, Clone)]
pub struct LocomotionController {
    settings: LocomotionSettings,
    ground: GroundProbeSettings,
    is_grounded: bool,
    is_jumping: bool,
    is_sprinting: bool,
    in_air_timer: f32,
    /// Set once Falling has been requested for this airborne stretch, cleared on landing.
    falling: bool,
}

impl LocomotionController {
    /// Starts airborne; the first probe decides whether the character stands on something.
    pub fn new(settings: LocomotionSettings, ground: GroundProbeSettings) -> Self {
        Self {
            settings,
            ground,
            is_grounded: false,
            is_jumping: false,
            is_sprinting: false,
            in_air_timer: 0.0,
            falling: false,
        }
    }

    /// One physics step: falling and landing always run, movement and rotation only when
    /// the gate is open and no jump is in flight.
    pub fn advance<W, B, A>(
        &mut self,
        world: &W,
        body: &mut B,
        anim: &mut AnimationCoordinator<A>,
        input: &LocomotionInput,
        dt: f32,
    ) where
        W: CollisionWorld + ?Sized,
        B: CharacterBody,
        A: AnimationEngine,
    {
        self.handle_falling_and_landing(world, body, anim, input, dt);

        if input.interacting || self.is_jumping {
            return;
        }

        let dir = planar_move_direction(
            input.camera_forward,
            input.camera_right,
            input.strafe,
            input.forward,
        );
        self.handle_movement(body, dir, input.move_amount);
        self.handle_rotation(body, dir, dt);
    }

    /// Launch a jump if grounded. Returns whether the character left the ground.
    pub fn jump<B, A>(&mut self, body: &mut B, anim: &mut AnimationCoordinator<A>) -> bool
    where
        B: CharacterBody,
        A: AnimationEngine,
    {
        if !self.is_grounded {
            return false;
        }

        anim.set_flag(AnimFlag::IsJumping, true);
        anim.play_one_shot(clips::JUMP, false);

        let launch = jump_launch_speed(self.settings.gravity_intensity, self.settings.jump_height);
        let mut velocity = body.velocity();
        velocity.y = launch;
        body.set_velocity(velocity);
        self.is_jumping = true;

        debug!("jump launched at {launch:.3} m/s");
        true
    }

    /// Sprinting needs both the input held and enough stick deflection.
    pub fn set_sprinting(&mut self, sprint_input: bool, move_amount: f32) {
        self.is_sprinting = sprint_input && move_amount > SPRINT_MOVE_AMOUNT;
    }

    /// Jump state read back from the animation engine.
    pub fn set_jumping(&mut self, jumping: bool) {
        self.is_jumping = jumping;
    }

    pub fn is_grounded(&self) -> bool {
        self.is_grounded
    }

    pub fn is_jumping(&self) -> bool {
        self.is_jumping
    }

    pub fn is_sprinting(&self) -> bool {
        self.is_sprinting
    }

    pub fn in_air_timer(&self) -> f32 {
        self.in_air_timer
    }

    pub fn settings(&self) -> &LocomotionSettings {
        &self.settings
    }

    fn handle_falling_and_landing<W, B, A>(
        &mut self,
        world: &W,
        body: &mut B,
        anim: &mut AnimationCoordinator<A>,
        input: &LocomotionInput,
        dt: f32,
    ) where
        W: CollisionWorld + ?Sized,
        B: CharacterBody,
        A: AnimationEngine,
    {
        let position = body.position();

        if !self.is_grounded && !self.is_jumping {
            if !self.falling && !input.interacting {
                self.falling = true;
                anim.play_one_shot(clips::FALLING, true);
            }

            self.in_air_timer += dt;
            body.add_force(-up() * self.settings.falling_speed * self.in_air_timer);
        }

        let origin = position + up() * self.ground.ray_cast_height_offset;
        let Some(hit) =
            world.cast_down(origin, self.ground.probe_distance, self.ground.ground_layers)
        else {
            if self.is_grounded {
                debug!("left the ground at {position:?}");
            }
            self.is_grounded = false;
            return;
        };

        if !self.is_grounded {
            debug!("landed after {:.3}s airborne", self.in_air_timer);
            if !input.interacting {
                anim.play_one_shot(clips::LAND, true);
            }
        }
        self.in_air_timer = 0.0;
        self.is_grounded = true;
        self.falling = false;

        if self.is_jumping || hit.point.y - position.y >= self.ground.max_climbing_height {
            return;
        }

        let grounded = Vec3::new(position.x, hit.point.y, position.z);
        if input.interacting || input.move_amount > 0.0 {
            let t = (dt / GROUND_EASE_WINDOW_S).clamp(0.0, 1.0);
            body.set_position(position.lerp(&grounded, t));
        } else {
            body.set_position(grounded);
        }
    }

    fn handle_movement<B: CharacterBody>(&self, body: &mut B, dir: Vec3, move_amount: f32) {
        let speed = select_speed(&self.settings, self.is_sprinting, move_amount);
        trace!("move {dir:?} at {speed}");
        body.set_velocity(dir * speed);
    }

    fn handle_rotation<B: CharacterBody>(&self, body: &mut B, dir: Vec3, dt: f32) {
        let current = body.rotation();
        let Some(target) = look_rotation(dir).or_else(|| look_rotation(forward_of(&current)))
        else {
            return;
        };
        body.set_rotation(turn_towards(
            &current,
            &target,
            self.settings.rotation_speed * dt,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        bitmask_flags::BitmaskFlags,
        body::KinematicBody,
        config::BodySettings,
        types::{LayerMask, Quat, RayHit},
    };

    const DT: f32 = 1.0 / 50.0;

    /// Flat ground at `height`, or nothing at all.
    struct Ground {
        height: Option<f32>,
    }

    impl CollisionWorld for Ground {
        fn cast_down(&self, origin: Vec3, max_distance: f32, _: LayerMask) -> Option<RayHit> {
            let height = self.height?;
            let distance = origin.y - height;
            (0.0..=max_distance).contains(&distance).then(|| RayHit {
                point: Vec3::new(origin.x, height, origin.z),
                distance,
            })
        }

        fn cast_sphere(&self, _: Vec3, _: f32, _: Vec3, _: f32, _: LayerMask) -> Option<RayHit> {
            None
        }
    }

    #[derive(Default)]
    struct Recorder {
        flags: BitmaskFlags<u8>,
        fades: Vec<String>,
    }

    impl AnimationEngine for Recorder {
        fn set_blend_target(&mut self, _: crate::animation::BlendAxis, _: f32, _: f32, _: f32) {}

        fn set_flag(&mut self, flag: AnimFlag, value: bool) {
            self.flags.set(flag, value);
        }

        fn flag(&self, flag: AnimFlag) -> bool {
            self.flags.has(flag)
        }

        fn cross_fade(&mut self, clip: &str, _: f32) {
            self.fades.push(clip.to_owned());
        }
    }

    struct Rig {
        loco: LocomotionController,
        body: KinematicBody,
        anim: AnimationCoordinator<Recorder>,
    }

    impl Rig {
        fn grounded() -> Self {
            let mut rig = Self {
                loco: LocomotionController::new(
                    LocomotionSettings::default(),
                    GroundProbeSettings::default(),
                ),
                body: KinematicBody::new(Vec3::zeros(), BodySettings::default()),
                anim: AnimationCoordinator::new(Recorder::default(), true),
            };
            rig.step(&Ground { height: Some(0.0) }, &idle());
            assert!(rig.loco.is_grounded());

            // Drop the settling frame's one-shots and falling force.
            rig.anim.engine_mut().fades.clear();
            rig.body = KinematicBody::new(Vec3::zeros(), BodySettings::default());
            rig
        }

        fn step(&mut self, world: &Ground, input: &LocomotionInput) {
            self.loco
                .advance(world, &mut self.body, &mut self.anim, input, DT);
        }

        fn count(&self, clip: &str) -> usize {
            self.anim
                .engine()
                .fades
                .iter()
                .filter(|c| c.as_str() == clip)
                .count()
        }
    }

    fn idle() -> LocomotionInput {
        LocomotionInput {
            strafe: 0.0,
            forward: 0.0,
            move_amount: 0.0,
            camera_forward: Vec3::z(),
            camera_right: Vec3::x(),
            interacting: false,
        }
    }

    fn forward() -> LocomotionInput {
        LocomotionInput {
            forward: 1.0,
            move_amount: 1.0,
            ..idle()
        }
    }

    #[test]
    fn airborne_round_trip_plays_falling_and_land_once() {
        for frames in [1, 2, 5, 40] {
            let mut rig = Rig::grounded();
            let air = Ground { height: None };

            // The frame the ground vanishes only clears the grounded flag.
            rig.step(&air, &idle());
            assert!(!rig.loco.is_grounded());

            for _ in 0..frames {
                rig.step(&air, &idle());
                assert!(rig.loco.in_air_timer() > 0.0);
            }

            rig.step(&Ground { height: Some(0.0) }, &idle());

            assert_eq!(rig.count(clips::FALLING), 1, "{frames} airborne frames");
            assert_eq!(rig.count(clips::LAND), 1, "{frames} airborne frames");
            assert_eq!(rig.loco.in_air_timer(), 0.0);
            assert!(rig.loco.is_grounded());
        }
    }

    #[test]
    fn falling_force_grows_with_air_time() {
        let mut rig = Rig::grounded();
        let air = Ground { height: None };
        rig.step(&air, &idle());

        rig.step(&air, &idle());
        let first = rig.body.pending_force().y;
        rig.body.step(DT);

        rig.step(&air, &idle());
        let second = rig.body.pending_force().y;

        assert!((first + 33.0 * DT).abs() < 1.0e-5);
        assert!((second + 33.0 * 2.0 * DT).abs() < 1.0e-5);
    }

    #[test]
    fn gate_suspends_movement_but_not_falling() {
        let mut rig = Rig::grounded();
        rig.body.set_velocity(Vec3::new(1.0, 0.0, 0.0));
        let air = Ground { height: None };
        let gated = LocomotionInput {
            interacting: true,
            ..forward()
        };

        rig.step(&air, &gated);
        for _ in 0..5 {
            rig.step(&air, &gated);
        }

        assert!((rig.loco.in_air_timer() - 5.0 * DT).abs() < 1.0e-5);
        assert_eq!(rig.body.velocity(), Vec3::new(1.0, 0.0, 0.0));
        // Interacting on the first airborne frame suppresses the one-shot.
        assert_eq!(rig.count(clips::FALLING), 0);
    }

    #[test]
    fn falling_plays_once_the_gate_reopens_mid_air() {
        let mut rig = Rig::grounded();
        let air = Ground { height: None };
        let gated = LocomotionInput {
            interacting: true,
            ..forward()
        };

        rig.step(&air, &gated);
        for _ in 0..3 {
            rig.step(&air, &gated);
        }
        assert_eq!(rig.count(clips::FALLING), 0);

        for _ in 0..10 {
            rig.step(&air, &forward());
        }

        assert_eq!(rig.count(clips::FALLING), 1);
        assert!((rig.loco.in_air_timer() - 13.0 * DT).abs() < 1.0e-5);
    }

    #[test]
    fn jump_requires_ground() {
        let mut rig = Rig::grounded();
        assert!(rig.loco.jump(&mut rig.body, &mut rig.anim));
        assert!((rig.body.velocity().y - 9.486_833).abs() < 1.0e-4);
        assert!(rig.anim.flag(AnimFlag::IsJumping));
        assert!(!rig.anim.flag(AnimFlag::IsInteracting));
        assert_eq!(rig.count(clips::JUMP), 1);

        let mut airborne = Rig::grounded();
        airborne.step(&Ground { height: None }, &idle());
        assert!(!airborne.loco.jump(&mut airborne.body, &mut airborne.anim));
    }

    #[test]
    fn horizontal_velocity_is_frozen_while_jumping() {
        let mut rig = Rig::grounded();
        rig.step(&Ground { height: Some(0.0) }, &forward());
        let launch_planar = rig.body.velocity().xz();

        rig.loco.jump(&mut rig.body, &mut rig.anim);
        let sideways = LocomotionInput {
            strafe: 1.0,
            forward: 0.0,
            ..forward()
        };
        for _ in 0..10 {
            rig.step(&Ground { height: None }, &sideways);
            rig.body.step(DT);
            assert_eq!(rig.body.velocity().xz(), launch_planar);
        }
    }

    #[test]
    fn idle_character_snaps_to_ground() {
        let mut rig = Rig::grounded();
        rig.body.set_position(Vec3::new(0.0, 0.05, 0.0));
        rig.step(&Ground { height: Some(0.0) }, &idle());
        assert_eq!(rig.body.position().y, 0.0);
    }

    #[test]
    fn moving_character_eases_onto_ground() {
        let mut rig = Rig::grounded();
        rig.body.set_position(Vec3::new(0.0, 0.05, 0.0));
        rig.step(&Ground { height: Some(0.0) }, &forward());

        let y = rig.body.position().y;
        assert!(y > 0.0 && y < 0.05, "got {y}");
    }

    #[test]
    fn steps_above_climb_height_are_not_snapped() {
        let mut rig = Rig::grounded();
        rig.step(&Ground { height: Some(0.3) }, &idle());
        assert!(rig.loco.is_grounded());
        assert_eq!(rig.body.position().y, 0.0);
    }

    #[test]
    fn speed_follows_gait() {
        let mut rig = Rig::grounded();
        let ground = Ground { height: Some(0.0) };

        let walk = LocomotionInput {
            forward: 0.3,
            move_amount: 0.3,
            ..idle()
        };
        rig.step(&ground, &walk);
        assert!((rig.body.velocity().norm() - 1.5).abs() < 1.0e-5);

        rig.step(&ground, &forward());
        assert!((rig.body.velocity().norm() - 5.0).abs() < 1.0e-5);

        rig.loco.set_sprinting(true, 1.0);
        rig.step(&ground, &forward());
        assert!((rig.body.velocity().norm() - 7.0).abs() < 1.0e-5);
    }

    #[test]
    fn sprint_needs_deflection() {
        let mut loco =
            LocomotionController::new(LocomotionSettings::default(), GroundProbeSettings::default());
        loco.set_sprinting(true, 0.5);
        assert!(!loco.is_sprinting());
        loco.set_sprinting(true, 0.51);
        assert!(loco.is_sprinting());
        loco.set_sprinting(false, 1.0);
        assert!(!loco.is_sprinting());
    }

    #[test]
    fn facing_turns_gradually_toward_movement() {
        let mut rig = Rig::grounded();
        let right = LocomotionInput {
            strafe: 1.0,
            forward: 0.0,
            ..forward()
        };
        let target = Quat::face_towards(&Vec3::x(), &up());

        rig.step(&Ground { height: Some(0.0) }, &right);
        let first = rig.body.rotation().angle_to(&target);
        assert!(first > 0.0 && first < std::f32::consts::FRAC_PI_2);

        for _ in 0..50 {
            rig.step(&Ground { height: Some(0.0) }, &right);
        }
        assert!(rig.body.rotation().angle_to(&target) < 1.0e-3);
    }

    #[test]
    fn idle_keeps_current_facing() {
        let mut rig = Rig::grounded();
        let facing = Quat::from_axis_angle(&Vec3::y_axis(), 1.0);
        rig.body.set_rotation(facing);

        rig.step(&Ground { height: Some(0.0) }, &idle());
        assert!(rig.body.rotation().angle_to(&facing) < 1.0e-5);
        assert_eq!(rig.body.velocity(), Vec3::zeros());
    }
}
