use crate::types::Vec2;

/// Latest decoded player input.
///
/// Written only by the input-binding layer through the setters below. The jump request
/// is edge-triggered: a press raises it, and the controller consumes it with
/// [`InputState::take_jump`] in the same phase it observes it, so holding the button
/// never re-fires.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputState {
    movement: Vec2,
    camera_delta: Vec2,
    sprint: bool,
    jump_requested: bool,
}

impl InputState {
    /// Movement stick, `x` = strafe, `y` = forward. Each axis is clamped to `[-1, 1]`;
    /// NaN components read as zero.
    pub fn set_movement(&mut self, movement: Vec2) {
        self.movement = Vec2::new(clamp_axis(movement.x), clamp_axis(movement.y));
    }

    /// Camera look delta for this frame. Non-finite components read as zero.
    pub fn set_camera_delta(&mut self, delta: Vec2) {
        let finite = |v: f32| if v.is_finite() { v } else { 0.0 };
        self.camera_delta = Vec2::new(finite(delta.x), finite(delta.y));
    }

    pub fn press_sprint(&mut self) {
        self.sprint = true;
    }

    pub fn release_sprint(&mut self) {
        self.sprint = false;
    }

    pub fn press_jump(&mut self) {
        self.jump_requested = true;
    }

    pub fn release_jump(&mut self) {
        self.jump_requested = false;
    }

    /// Consume a pending jump press. Returns `true` at most once per press.
    pub fn take_jump(&mut self) -> bool {
        std::mem::take(&mut self.jump_requested)
    }

    pub fn movement(&self) -> Vec2 {
        self.movement
    }

    #[inline]
    pub fn strafe(&self) -> f32 {
        self.movement.x
    }

    #[inline]
    pub fn forward(&self) -> f32 {
        self.movement.y
    }

    pub fn camera_delta(&self) -> Vec2 {
        self.camera_delta
    }

    pub fn sprint(&self) -> bool {
        self.sprint
    }

    pub fn jump_requested(&self) -> bool {
        self.jump_requested
    }
}

fn clamp_axis(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(-1.0, 1.0) }
}
