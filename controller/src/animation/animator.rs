//! A small state-table animator.
//!
//! Stands in for a full animation state machine: it keeps the two blend axes and the
//! boolean flags, tracks which named state is playing, and follows the transitions in a
//! [`StateTable`]. Entering a state can write flags, which is how `IsJumping` and
//! `IsInteracting` get cleared once the one-shot that raised them is over.

use std::collections::HashMap;

use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use super::{AnimFlag, AnimationEngine, BlendAxis};
use crate::{bitmask_flags::BitmaskFlags, constants::clips, error::ConfigError};

/// Declarative description of the animator's states.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StateTable {
    /// State active before any cross-fade.
    pub entry: String,
    pub states: Vec<StateDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StateDef {
    pub name: String,
    /// Length of a non-looping clip. `None` loops forever.
    #[serde(default)]
    pub clip_length: Option<f32>,
    /// State to blend into once the clip has played out.
    #[serde(default)]
    pub exit_to: Option<String>,
    #[serde(default = "default_blend")]
    pub exit_blend: f32,
    /// Flags written when the state is entered.
    #[serde(default)]
    pub on_enter: Vec<FlagWrite>,
    /// Checked in order; the first match wins.
    #[serde(default)]
    pub transitions: Vec<FlagTransition>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FlagWrite {
    pub flag: AnimFlag,
    pub value: bool,
}

/// Leave the state once `when` reads `is`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlagTransition {
    pub when: AnimFlag,
    pub is: bool,
    pub to: String,
    #[serde(default = "default_blend")]
    pub blend: f32,
}

fn default_blend() -> f32 {
    0.2
}

impl StateDef {
    fn looping(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            clip_length: None,
            exit_to: None,
            exit_blend: default_blend(),
            on_enter: Vec::new(),
            transitions: Vec::new(),
        }
    }

    fn one_shot(name: &str, clip_length: f32, exit_to: &str) -> Self {
        Self {
            clip_length: Some(clip_length),
            exit_to: Some(exit_to.to_owned()),
            ..Self::looping(name)
        }
    }

    fn on_enter(mut self, flag: AnimFlag, value: bool) -> Self {
        self.on_enter.push(FlagWrite { flag, value });
        self
    }

    fn when(mut self, flag: AnimFlag, is: bool, to: &str) -> Self {
        self.transitions.push(FlagTransition {
            when: flag,
            is,
            to: to.to_owned(),
            blend: default_blend(),
        });
        self
    }
}

impl Default for StateTable {
    fn default() -> Self {
        Self {
            entry: clips::EMPTY.to_owned(),
            states: vec![
                StateDef::looping(clips::EMPTY).on_enter(AnimFlag::IsInteracting, false),
                StateDef::one_shot(clips::JUMP, 0.3, clips::FALLING),
                StateDef::looping(clips::FALLING)
                    .on_enter(AnimFlag::IsJumping, false)
                    .when(AnimFlag::IsGrounded, true, clips::LAND),
                StateDef::one_shot(clips::LAND, 0.4, clips::EMPTY)
                    .on_enter(AnimFlag::IsJumping, false),
            ],
        }
    }
}

impl StateTable {
    /// Every referenced state must exist and clip lengths must be usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let known = |name: &str| self.states.iter().any(|s| s.name == name);

        if !known(&self.entry) {
            return Err(ConfigError::UnknownState {
                from: "entry".to_owned(),
                to: self.entry.clone(),
            });
        }

        for state in &self.states {
            if let Some(len) = state.clip_length
                && !(len.is_finite() && len > 0.0)
            {
                return Err(ConfigError::NotPositive {
                    field: "states.clip_length",
                    value: len,
                });
            }

            let targets = state
                .exit_to
                .iter()
                .chain(state.transitions.iter().map(|t| &t.to));
            for to in targets {
                if !known(to) {
                    return Err(ConfigError::UnknownState {
                        from: state.name.clone(),
                        to: to.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct BlendValue {
    current: f32,
    target: f32,
}

impl BlendValue {
    fn advance(&mut self, target: f32, damp_time: f32, dt: f32) {
        self.target = target;
        if damp_time <= 0.0 {
            self.current = target;
            return;
        }
        let t = 1.0 - (-dt.max(0.0) / damp_time).exp();
        self.current += (target - self.current) * t;
    }
}

#[derive(Debug, Clone, Copy)]
struct CrossFade {
    from: usize,
    duration: f32,
    elapsed: f32,
}

/// Reference [`AnimationEngine`] driven by a [`StateTable`].
///
/// Call [`StateAnimator::update`] once per rendered frame.
#[derive(Debug, Clone)]
pub struct StateAnimator {
    table: StateTable,
    index: HashMap<String, usize>,
    current: usize,
    time_in_state: f32,
    fade: Option<CrossFade>,
    flags: BitmaskFlags<u8>,
    horizontal: BlendValue,
    vertical: BlendValue,
}

impl StateAnimator {
    /// Build an animator from a validated table.
    pub fn new(table: StateTable) -> Result<Self, ConfigError> {
        table.validate()?;

        let index: HashMap<String, usize> = table
            .states
            .iter()
            .enumerate()
            .map(|(i, s)| (s.name.clone(), i))
            .collect();
        let entry = index.get(&table.entry).copied().unwrap_or_default();

        let mut animator = Self {
            table,
            index,
            current: entry,
            time_in_state: 0.0,
            fade: None,
            flags: BitmaskFlags::default(),
            horizontal: BlendValue::default(),
            vertical: BlendValue::default(),
        };
        animator.apply_on_enter(entry);
        Ok(animator)
    }

    /// Advance clip time and cross-fades, then follow at most one transition.
    ///
    /// Transitions out of a state are held until the fade into it has completed.
    pub fn update(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        self.time_in_state += dt;

        if let Some(fade) = self.fade.as_mut() {
            fade.elapsed += dt;
            if fade.elapsed >= fade.duration {
                self.fade = None;
            } else {
                return;
            }
        }

        let state = &self.table.states[self.current];

        if let (Some(len), Some(exit)) = (state.clip_length, state.exit_to.as_deref())
            && self.time_in_state >= len
        {
            let (exit, blend) = (exit.to_owned(), state.exit_blend);
            self.enter_by_name(&exit, blend);
            return;
        }

        let next = state
            .transitions
            .iter()
            .find(|t| self.flags.has(t.when) == t.is)
            .map(|t| (t.to.clone(), t.blend));
        if let Some((to, blend)) = next {
            self.enter_by_name(&to, blend);
        }
    }

    pub fn current_state(&self) -> &str {
        &self.table.states[self.current].name
    }

    /// State being faded out of, if a cross-fade is in progress.
    pub fn previous_state(&self) -> Option<&str> {
        self.fade
            .map(|f| self.table.states[f.from].name.as_str())
    }

    /// Weight of the current state in `[0, 1]`; below one while fading in.
    pub fn fade_weight(&self) -> f32 {
        match self.fade {
            Some(f) if f.duration > 0.0 => (f.elapsed / f.duration).clamp(0.0, 1.0),
            _ => 1.0,
        }
    }

    pub fn time_in_state(&self) -> f32 {
        self.time_in_state
    }

    /// Current (damped) value of a blend axis.
    pub fn value(&self, axis: BlendAxis) -> f32 {
        self.blend(axis).current
    }

    /// Last target requested for a blend axis.
    pub fn target(&self, axis: BlendAxis) -> f32 {
        self.blend(axis).target
    }

    fn blend(&self, axis: BlendAxis) -> &BlendValue {
        match axis {
            BlendAxis::Horizontal => &self.horizontal,
            BlendAxis::Vertical => &self.vertical,
        }
    }

    fn enter_by_name(&mut self, name: &str, blend: f32) {
        match self.index.get(name).copied() {
            Some(idx) => self.enter(idx, blend),
            None => warn!("animator has no state named {name}"),
        }
    }

    fn enter(&mut self, idx: usize, blend: f32) {
        debug!(
            "animator {} -> {} over {blend}s",
            self.current_state(),
            self.table.states[idx].name
        );

        self.fade = (blend > 0.0).then_some(CrossFade {
            from: self.current,
            duration: blend,
            elapsed: 0.0,
        });
        self.current = idx;
        self.time_in_state = 0.0;
        self.apply_on_enter(idx);
    }

    fn apply_on_enter(&mut self, idx: usize) {
        for write in &self.table.states[idx].on_enter {
            self.flags.set(write.flag, write.value);
        }
    }
}

impl AnimationEngine for StateAnimator {
    fn set_blend_target(&mut self, axis: BlendAxis, value: f32, damp_time: f32, dt: f32) {
        let blend = match axis {
            BlendAxis::Horizontal => &mut self.horizontal,
            BlendAxis::Vertical => &mut self.vertical,
        };
        blend.advance(value, damp_time, dt);
        trace!("{axis:?} -> {} (target {value})", blend.current);
    }

    fn set_flag(&mut self, flag: AnimFlag, value: bool) {
        self.flags.set(flag, value);
    }

    fn flag(&self, flag: AnimFlag) -> bool {
        self.flags.has(flag)
    }

    fn cross_fade(&mut self, clip: &str, duration: f32) {
        self.enter_by_name(clip, duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn animator() -> StateAnimator {
        StateAnimator::new(StateTable::default()).expect("default table is valid")
    }

    fn run(anim: &mut StateAnimator, seconds: f32) {
        let dt = 1.0 / 60.0;
        let mut t = 0.0;
        while t < seconds {
            anim.update(dt);
            t += dt;
        }
    }

    #[test]
    fn default_table_validates() {
        StateTable::default().validate().expect("valid");
    }

    #[test]
    fn unknown_target_is_rejected() {
        let mut table = StateTable::default();
        table.states[1].exit_to = Some("Nowhere".to_owned());
        assert!(matches!(
            table.validate(),
            Err(ConfigError::UnknownState { to, .. }) if to == "Nowhere"
        ));
    }

    #[test]
    fn unknown_clip_is_ignored() {
        let mut anim = animator();
        anim.cross_fade("Dance", 0.2);
        assert_eq!(anim.current_state(), "Empty");
    }

    #[test]
    fn jump_plays_out_into_falling_and_clears_jumping() {
        let mut anim = animator();
        anim.set_flag(AnimFlag::IsJumping, true);
        anim.cross_fade("Jump", 0.2);
        assert_eq!(anim.current_state(), "Jump");

        run(&mut anim, 0.35);
        assert_eq!(anim.current_state(), "Falling");
        assert!(!anim.flag(AnimFlag::IsJumping));
    }

    #[test]
    fn falling_lands_once_grounded() {
        let mut anim = animator();
        anim.set_flag(AnimFlag::IsInteracting, true);
        anim.cross_fade("Falling", 0.2);

        run(&mut anim, 0.5);
        assert_eq!(anim.current_state(), "Falling");

        anim.set_flag(AnimFlag::IsGrounded, true);
        run(&mut anim, 0.05);
        assert_eq!(anim.current_state(), "Land");
        assert!(anim.flag(AnimFlag::IsInteracting));

        run(&mut anim, 0.7);
        assert_eq!(anim.current_state(), "Empty");
        assert!(!anim.flag(AnimFlag::IsInteracting));
    }

    #[test]
    fn transitions_wait_for_fade_in() {
        let mut anim = animator();
        // Still flagged grounded from the previous frame.
        anim.set_flag(AnimFlag::IsGrounded, true);
        anim.cross_fade("Falling", 0.2);

        anim.update(0.1);
        assert_eq!(anim.current_state(), "Falling");
        assert_eq!(anim.previous_state(), Some("Empty"));
        assert!((anim.fade_weight() - 0.5).abs() < 1.0e-5);

        anim.set_flag(AnimFlag::IsGrounded, false);
        run(&mut anim, 0.3);
        assert_eq!(anim.current_state(), "Falling");
        assert_eq!(anim.fade_weight(), 1.0);
    }

    #[test]
    fn blend_axes_ease_toward_target() {
        let mut anim = animator();
        anim.set_blend_target(BlendAxis::Vertical, 1.0, 0.1, 1.0 / 60.0);

        let first = anim.value(BlendAxis::Vertical);
        assert!(first > 0.0 && first < 1.0);
        assert_eq!(anim.target(BlendAxis::Vertical), 1.0);

        for _ in 0..120 {
            anim.set_blend_target(BlendAxis::Vertical, 1.0, 0.1, 1.0 / 60.0);
        }
        assert!((anim.value(BlendAxis::Vertical) - 1.0).abs() < 1.0e-4);
        assert_eq!(anim.value(BlendAxis::Horizontal), 0.0);
    }

    #[test]
    fn table_parses_from_ron() {
        let table: StateTable = ron::from_str(
            r#"(
                entry: "Idle",
                states: [
                    (name: "Idle", on_enter: [(flag: IsInteracting, value: false)]),
                    (name: "Roll", clip_length: Some(0.5), exit_to: Some("Idle")),
                ],
            )"#,
        )
        .expect("parse");

        table.validate().expect("valid");
        let mut anim = StateAnimator::new(table).expect("animator");
        anim.cross_fade("Roll", 0.0);
        anim.update(0.6);
        assert_eq!(anim.current_state(), "Idle");
    }
}
