use log::debug;

use super::{AnimFlag, AnimationEngine, BlendAxis};
use crate::{
    constants::{BLEND_DAMP_TIME_S, ONE_SHOT_CROSS_FADE_S},
    quantize::locomotion_blend_targets,
};

/// Translates motion intent into animation parameters on an [`AnimationEngine`].
#[derive(Debug)]
pub struct AnimationCoordinator<A> {
    engine: A,
    snap_movement: bool,
}

impl<A: AnimationEngine> AnimationCoordinator<A> {
    pub fn new(engine: A, snap_movement: bool) -> Self {
        Self {
            engine,
            snap_movement,
        }
    }

    /// Push the locomotion blend targets for this frame.
    pub fn update_locomotion_blend(&mut self, strafe: f32, forward: f32, sprinting: bool, dt: f32) {
        let (h, v) = locomotion_blend_targets(strafe, forward, sprinting, self.snap_movement);
        self.engine
            .set_blend_target(BlendAxis::Horizontal, h, BLEND_DAMP_TIME_S, dt);
        self.engine
            .set_blend_target(BlendAxis::Vertical, v, BLEND_DAMP_TIME_S, dt);
    }

    /// Cross-fade to `clip`, marking whether it owns the character while it plays.
    pub fn play_one_shot(&mut self, clip: &str, interacting: bool) {
        debug!("one-shot {clip} (interacting: {interacting})");
        self.engine.set_flag(AnimFlag::IsInteracting, interacting);
        self.engine.cross_fade(clip, ONE_SHOT_CROSS_FADE_S);
    }

    #[inline]
    pub fn flag(&self, flag: AnimFlag) -> bool {
        self.engine.flag(flag)
    }

    #[inline]
    pub fn set_flag(&mut self, flag: AnimFlag, value: bool) {
        self.engine.set_flag(flag, value);
    }

    pub fn snap_movement(&self) -> bool {
        self.snap_movement
    }

    /// Switch snapping on or off; takes effect on the next blend update.
    pub fn set_snap_movement(&mut self, snap: bool) {
        self.snap_movement = snap;
    }

    pub fn engine(&self) -> &A {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut A {
        &mut self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitmask_flags::BitmaskFlags;

    #[derive(Default)]
    struct Recorder {
        targets: Vec<(BlendAxis, f32, f32)>,
        flags: BitmaskFlags<u8>,
        fades: Vec<(String, f32)>,
    }

    impl AnimationEngine for Recorder {
        fn set_blend_target(&mut self, axis: BlendAxis, value: f32, damp_time: f32, _dt: f32) {
            self.targets.push((axis, value, damp_time));
        }

        fn set_flag(&mut self, flag: AnimFlag, value: bool) {
            self.flags.set(flag, value);
        }

        fn flag(&self, flag: AnimFlag) -> bool {
            self.flags.has(flag)
        }

        fn cross_fade(&mut self, clip: &str, duration: f32) {
            self.fades.push((clip.to_owned(), duration));
        }
    }

    #[test]
    fn blend_targets_are_snapped_and_damped() {
        let mut anim = AnimationCoordinator::new(Recorder::default(), true);
        anim.update_locomotion_blend(0.0, 0.3, false, 0.016);

        assert_eq!(
            anim.engine().targets,
            vec![
                (BlendAxis::Horizontal, 0.0, 0.1),
                (BlendAxis::Vertical, 0.5, 0.1),
            ]
        );
    }

    #[test]
    fn raw_values_pass_when_snapping_is_off() {
        let mut anim = AnimationCoordinator::new(Recorder::default(), false);
        anim.update_locomotion_blend(0.0, 0.3, true, 0.016);
        assert_eq!(anim.engine().targets[1], (BlendAxis::Vertical, 0.3, 0.1));
    }

    #[test]
    fn snapping_can_be_toggled_between_updates() {
        let mut anim = AnimationCoordinator::new(Recorder::default(), true);
        anim.update_locomotion_blend(0.3, 0.7, false, 0.016);

        anim.set_snap_movement(false);
        assert!(!anim.snap_movement());
        anim.update_locomotion_blend(0.3, 0.7, false, 0.016);

        let values: Vec<f32> = anim.engine().targets.iter().map(|t| t.1).collect();
        assert_eq!(values, vec![0.5, 1.0, 0.3, 0.7]);
    }

    #[test]
    fn one_shot_sets_interacting_then_fades() {
        let mut anim = AnimationCoordinator::new(Recorder::default(), true);

        anim.play_one_shot("Falling", true);
        assert!(anim.flag(AnimFlag::IsInteracting));

        anim.play_one_shot("Jump", false);
        assert!(!anim.flag(AnimFlag::IsInteracting));

        assert_eq!(
            anim.engine().fades,
            vec![("Falling".to_owned(), 0.2), ("Jump".to_owned(), 0.2)]
        );
    }
}
