//! Debug/performance tooling for native dev builds.
//!
//! Adds the perf overlay and draws the controller's scene queries: the ground probe, the
//! camera pivot and the camera's collision sphere. Gated behind `dev_native` in `main.rs`.

use bevy::color::palettes::css::{LIME, ORANGE_RED, YELLOW};
use bevy::diagnostic::{
    EntityCountDiagnosticsPlugin, FrameTimeDiagnosticsPlugin, SystemInformationDiagnosticsPlugin,
};
use bevy::prelude::*;
use bevy::render::diagnostic::RenderDiagnosticsPlugin;
use controller::{CharacterBody, types::up};
use iyes_perf_ui::prelude::*;

use crate::{
    config::CharacterConfig,
    convert::to_bevy,
    player::{Character, CharacterLate},
};

pub(super) fn plugin(app: &mut App) {
    app.add_plugins((
        FrameTimeDiagnosticsPlugin::default(),
        EntityCountDiagnosticsPlugin::default(),
        SystemInformationDiagnosticsPlugin::default(),
        RenderDiagnosticsPlugin,
        PerfUiPlugin,
    ));

    app.add_systems(Startup, spawn_perf_ui);
    app.add_systems(
        PostUpdate,
        draw_queries
            .after(CharacterLate)
            .run_if(resource_exists::<Character>),
    );
}

fn spawn_perf_ui(mut commands: Commands) {
    commands.spawn(PerfUiAllEntries::default());
}

fn draw_queries(mut gizmos: Gizmos, character: Res<Character>, config: Res<CharacterConfig>) {
    let c = &character.0;
    let ground = &config.0.ground;
    let camera = &config.0.camera;

    let origin = c.body().position() + up() * ground.ray_cast_height_offset;
    let end = origin - up() * ground.probe_distance;
    let probe_color = if c.locomotion().is_grounded() { LIME } else { ORANGE_RED };
    gizmos.line(to_bevy(origin), to_bevy(end), probe_color);

    let follow = c.camera();
    gizmos.sphere(to_bevy(follow.pivot_position()), 0.05, YELLOW);
    gizmos.line(
        to_bevy(follow.pivot_position()),
        to_bevy(follow.position()),
        YELLOW,
    );

    gizmos.sphere(to_bevy(follow.position()), camera.collision_radius, ORANGE_RED);
}
