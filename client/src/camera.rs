use bevy::{camera::Exposure, prelude::*, transform::TransformSystems};

use crate::{
    convert::to_bevy,
    player::{Character, CharacterLate},
};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(Startup, add_camera);
    app.add_systems(
        PostUpdate,
        place_camera
            .after(CharacterLate)
            .before(TransformSystems::Propagate)
            .run_if(resource_exists::<Character>),
    );
}

fn add_camera(mut commands: Commands) {
    commands.spawn((
        Exposure { ev100: 13.0 },
        bevy::core_pipeline::tonemapping::Tonemapping::AcesFitted,
        Camera3d::default(),
        Transform::from_xyz(0.0, 3.0, -4.0).looking_at(Vec3::ZERO, Vec3::Y),
        DistanceFog {
            color: Color::srgba(0.35, 0.48, 0.66, 1.0),
            directional_light_color: Color::srgba(1.0, 0.95, 0.85, 0.5),
            directional_light_exponent: 30.0,
            falloff: FogFalloff::from_visibility_colors(
                200.0,
                Color::srgb(0.35, 0.5, 0.66),
                Color::srgb(0.8, 0.8, 0.7),
            ),
        },
    ));
}

/// Put the render camera where the follow camera ended up this frame.
fn place_camera(character: Res<Character>, mut camera: Single<&mut Transform, With<Camera3d>>) {
    let follow = character.0.camera();
    let position = to_bevy(follow.position());
    let forward = to_bevy(follow.forward());

    **camera = Transform::from_translation(position).looking_to(forward, Vec3::Y);
}
