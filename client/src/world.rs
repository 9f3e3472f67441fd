use bevy::prelude::*;
use controller::{RapierQueryWorld, WorldStaticDef};

use crate::convert::to_bevy;

pub const GROUND_LAYER: u8 = 0;
pub const PROPS_LAYER: u8 = 1;

const GROUND_SIZE: f32 = 60.0;

/// Static collision geometry matching the rendered level.
#[derive(Resource)]
pub struct LevelColliders(pub RapierQueryWorld);

pub(super) fn plugin(app: &mut App) {
    let colliders = RapierQueryWorld::build(level_defs())
        .unwrap_or_else(|err| panic!("invalid level colliders: {err}"));
    app.insert_resource(LevelColliders(colliders));
    app.add_systems(Startup, setup);
}

/// Boxes in controller space: a short staircase, a ledge to jump from and a wall for the
/// camera to bump into.
fn boxes() -> Vec<WorldStaticDef> {
    let mut defs = Vec::new();
    let mut id = 10;
    let mut push = |center: controller::Vec3, half: controller::Vec3| {
        defs.push(WorldStaticDef::cuboid(id, center, half, PROPS_LAYER));
        id += 1;
    };

    for step in 0..6 {
        let height = 0.08 * (step + 1) as f32;
        push(
            controller::Vec3::new(4.0, height * 0.5, 6.0 + step as f32 * 0.5),
            controller::Vec3::new(1.0, height * 0.5, 0.25),
        );
    }

    push(
        controller::Vec3::new(-5.0, 0.75, 8.0),
        controller::Vec3::new(2.0, 0.75, 2.0),
    );

    push(
        controller::Vec3::new(0.0, 1.5, -6.0),
        controller::Vec3::new(4.0, 1.5, 0.25),
    );

    defs
}

fn level_defs() -> Vec<WorldStaticDef> {
    let mut defs = vec![WorldStaticDef::ground_plane(1, 0.0, GROUND_LAYER)];
    defs.extend(boxes());
    defs
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    info!("spawning level");

    commands.spawn((
        Name::new("Ground"),
        Transform::from_xyz(0., 0., 0.),
        Mesh3d(meshes.add(Plane3d::default().mesh().size(GROUND_SIZE, GROUND_SIZE).build())),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::linear_rgb(0.2, 0.3, 0.25),
            perceptual_roughness: 1.0,
            metallic: 0.0,
            ..default()
        })),
    ));

    let prop_material = materials.add(Color::srgb_u8(124, 144, 255));
    for def in boxes() {
        let controller::ColliderShapeDef::Cuboid { half_extents } = def.shape else {
            continue;
        };
        commands.spawn((
            Name::new(format!("Prop {}", def.id)),
            Mesh3d(meshes.add(Cuboid::new(
                half_extents.x * 2.0,
                half_extents.y * 2.0,
                half_extents.z * 2.0,
            ))),
            MeshMaterial3d(prop_material.clone()),
            Transform::from_translation(to_bevy(def.translation)),
        ));
    }

    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 8.0, 4.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}
