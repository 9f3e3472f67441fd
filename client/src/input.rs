use bevy::{
    prelude::*,
    window::{CursorGrabMode, CursorOptions, PrimaryWindow},
};
use leafwing_input_manager::prelude::*;

/// Degrees of look input per pixel of mouse travel, before the camera's look speeds.
const MOUSE_LOOK_SENSITIVITY: f32 = 0.05;

#[derive(Reflect, Actionlike, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CharacterAction {
    #[actionlike(DualAxis)]
    Move,
    #[actionlike(DualAxis)]
    Look,
    Sprint,
    Jump,
}

pub(super) fn plugin(app: &mut App) {
    app.add_plugins(InputManagerPlugin::<CharacterAction>::default());

    app.register_type::<CharacterAction>();

    app.insert_resource(default_input_map());
    app.insert_resource(ActionState::<CharacterAction>::default());

    app.add_systems(Update, grab_cursor);
}

fn default_input_map() -> InputMap<CharacterAction> {
    InputMap::default()
        .with_dual_axis(CharacterAction::Move, VirtualDPad::wasd())
        .with_dual_axis(CharacterAction::Move, GamepadStick::LEFT)
        .with_dual_axis(
            CharacterAction::Look,
            // Window Y grows downward; the camera expects up to be positive.
            MouseMove::default()
                .inverted_y()
                .sensitivity(MOUSE_LOOK_SENSITIVITY),
        )
        .with_dual_axis(CharacterAction::Look, GamepadStick::RIGHT)
        .with(CharacterAction::Sprint, KeyCode::ShiftLeft)
        .with(CharacterAction::Sprint, GamepadButton::East)
        .with(CharacterAction::Jump, KeyCode::Space)
        .with(CharacterAction::Jump, GamepadButton::South)
}

/// Lock the cursor on click so mouse travel drives the camera; Escape releases it.
fn grab_cursor(
    mut cursor: Single<&mut CursorOptions, With<PrimaryWindow>>,
    mouse: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
) {
    if mouse.just_pressed(MouseButton::Left) {
        cursor.grab_mode = CursorGrabMode::Locked;
        cursor.visible = false;
    } else if keys.just_pressed(KeyCode::Escape) {
        cursor.grab_mode = CursorGrabMode::None;
        cursor.visible = true;
    }
}
