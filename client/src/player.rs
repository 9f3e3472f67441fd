//! The controlled character: owns the coordinator and runs its three phases on Bevy's
//! schedules.
//!
//! - `Update`: input edges → `input_phase`, then the animator tick.
//! - `FixedUpdate`: `fixed_phase`, then the body sweep through the level.
//! - `PostUpdate`: `late_phase`, then the player transform.

use bevy::{prelude::*, transform::TransformSystems};
use controller::{CharacterBody, CharacterCoordinator, KinematicBody, StateAnimator};
use leafwing_input_manager::prelude::ActionState;

use crate::{
    config::CharacterConfig,
    convert::{to_bevy, to_bevy_rotation},
    input::CharacterAction,
    world::LevelColliders,
};

/// Feet position the character drops in at.
fn spawn_point() -> controller::Vec3 {
    controller::Vec3::new(0.0, 2.0, 0.0)
}

#[derive(Resource)]
pub struct Character(pub CharacterCoordinator<StateAnimator, KinematicBody>);

#[derive(Component)]
pub struct Player;

/// Runs the late phase; anything presenting the character or camera goes after it.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct CharacterLate;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, spawn_player);

    app.add_systems(
        Update,
        (apply_input, input_phase, tick_animator)
            .chain()
            .run_if(resource_exists::<Character>),
    );

    app.add_systems(
        FixedUpdate,
        fixed_phase.run_if(resource_exists::<Character>),
    );

    app.add_systems(
        PostUpdate,
        (late_phase, sync_player_transform)
            .chain()
            .in_set(CharacterLate)
            .before(TransformSystems::Propagate)
            .run_if(resource_exists::<Character>),
    );
}

fn spawn_player(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config: Res<CharacterConfig>,
) {
    let coordinator =
        CharacterCoordinator::with_reference_collaborators(config.0.clone(), spawn_point())
            .expect("controller config must be valid");

    let body = &config.0.body;
    let center_height = body.capsule_half_height + body.capsule_radius;

    commands
        .spawn((
            Name::new("Player"),
            Player,
            Transform::from_translation(to_bevy(spawn_point())),
            Visibility::default(),
        ))
        .with_children(|parent| {
            parent.spawn((
                Mesh3d(meshes.add(Capsule3d::new(
                    body.capsule_radius,
                    body.capsule_half_height * 2.0,
                ))),
                MeshMaterial3d(materials.add(Color::srgb_u8(230, 180, 90))),
                Transform::from_xyz(0.0, center_height, 0.0),
            ));
            // Nose on the local forward axis so facing is visible.
            parent.spawn((
                Mesh3d(meshes.add(Cuboid::new(0.15, 0.15, 0.3))),
                MeshMaterial3d(materials.add(Color::srgb_u8(60, 60, 60))),
                Transform::from_xyz(0.0, center_height * 1.5, body.capsule_radius),
            ));
        });

    commands.insert_resource(Character(coordinator));
}

fn apply_input(mut character: ResMut<Character>, actions: Res<ActionState<CharacterAction>>) {
    let input = character.0.input_mut();

    let movement = actions.axis_pair(&CharacterAction::Move);
    // Strafe right is +X for the controller.
    input.set_movement(controller::Vec2::new(movement.x, movement.y));

    let look = actions.axis_pair(&CharacterAction::Look);
    input.set_camera_delta(controller::Vec2::new(look.x, look.y));

    if actions.just_pressed(&CharacterAction::Sprint) {
        input.press_sprint();
    } else if actions.just_released(&CharacterAction::Sprint) {
        input.release_sprint();
    }

    if actions.just_pressed(&CharacterAction::Jump) {
        input.press_jump();
    } else if actions.just_released(&CharacterAction::Jump) {
        input.release_jump();
    }
}

fn input_phase(mut character: ResMut<Character>, time: Res<Time>) {
    character.0.input_phase(time.delta_secs());
}

fn tick_animator(mut character: ResMut<Character>, time: Res<Time>) {
    character
        .0
        .animation_mut()
        .engine_mut()
        .update(time.delta_secs());
}

fn fixed_phase(mut character: ResMut<Character>, level: Res<LevelColliders>, time: Res<Time>) {
    let dt = time.delta_secs();
    let coordinator = &mut character.0;
    coordinator.fixed_phase(&level.0, dt);
    coordinator.body_mut().step_in_world(&level.0, dt);
}

fn late_phase(mut character: ResMut<Character>, level: Res<LevelColliders>, time: Res<Time>) {
    character.0.late_phase(&level.0, time.delta_secs());
}

fn sync_player_transform(
    character: Res<Character>,
    mut player: Single<&mut Transform, With<Player>>,
) {
    let body = character.0.body();
    player.translation = to_bevy(body.position());
    player.rotation = to_bevy_rotation(body.rotation());
}
