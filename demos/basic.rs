//! Minimal scene with one cylindrical waterfall.
//!
//! Run with `cargo run --example basic`.

use bevy::prelude::*;
use waterfall::{
    ActiveMap, CreateWaterfall, WaterfallParams, WaterfallPlugin, WaterfallSettings,
    WaterfallShape,
};

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(WaterfallPlugin)
        .insert_resource(WaterfallSettings {
            square_size: 1.0,
            ..Default::default()
        })
        .add_systems(Startup, setup)
        .run();
}

fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut create: EventWriter<CreateWaterfall>,
) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(8.0, 6.0, 8.0).looking_at(Vec3::new(0.0, 2.0, 0.0), Vec3::Y),
    ));
    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            ..default()
        },
        Transform::from_xyz(4.0, 10.0, 4.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    // The "map": a flat ground plane under a root entity the plugin can use
    // as the map identity.
    let map_root = commands
        .spawn((Transform::default(), Visibility::default()))
        .id();
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(20.0, 20.0))),
        MeshMaterial3d(materials.add(Color::srgb(0.3, 0.5, 0.3))),
        ChildOf(map_root),
    ));
    commands.insert_resource(ActiveMap {
        root: Some(map_root),
    });

    // Host object the waterfall attaches to: a rock column.
    let host = commands
        .spawn((
            Mesh3d(meshes.add(Cuboid::new(1.0, 0.5, 1.0))),
            MeshMaterial3d(materials.add(Color::srgb(0.4, 0.4, 0.45))),
            Transform::from_xyz(0.0, 0.25, 0.0),
            ChildOf(map_root),
        ))
        .id();

    create.write(CreateWaterfall {
        host,
        params: WaterfallParams {
            diameter: 2.0,
            height: 4.0,
            shape: WaterfallShape::Cylinder,
            speed: 1.2,
            top_dark: Color::srgb(0.05, 0.25, 0.45),
            bottom_dark: Color::srgb(0.03, 0.18, 0.35),
            top_light: Color::srgb(0.35, 0.65, 0.85),
            bottom_light: Color::srgb(0.25, 0.55, 0.8),
            foam_color: Color::srgb(0.9, 0.95, 1.0),
            add_foam: true,
            opacity: 1.0,
        },
    });
}
