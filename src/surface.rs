//! Renderable surface factory.
//!
//! Builds the falling-water mesh, its material and the optional foam emitter
//! for one waterfall, and attaches everything to the host entity. Dimensions
//! arrive in map squares and are converted to world units here.

use bevy::{pbr::ExtendedMaterial, prelude::*, render::render_resource::Face};
use serde::{Deserialize, Serialize};

use crate::emitter::FoamEmitter;
use crate::material::{WaterfallMaterial, WaterfallMaterialExtension, WaterfallUniform};
use crate::particle::FoamVisual;
use crate::shape::WaterfallShape;

/// Parameters of one waterfall, as supplied by the host game's scripts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaterfallParams {
    /// Width of the waterfall in map squares.
    pub diameter: f32,
    /// Height in map squares; negative makes the water flow upward.
    pub height: f32,
    /// Body shape.
    pub shape: WaterfallShape,
    /// Scroll speed of the water pattern.
    pub speed: f32,
    /// Gradient color, top shaded band.
    pub top_dark: Color,
    /// Gradient color, bottom shaded band.
    pub bottom_dark: Color,
    /// Gradient color, top lit band.
    pub top_light: Color,
    /// Gradient color, bottom lit band.
    pub bottom_light: Color,
    /// Foam color, used for both the surface highlight and the particles.
    pub foam_color: Color,
    /// Whether to attach a foam particle emitter.
    pub add_foam: bool,
    /// Initial surface opacity.
    pub opacity: f32,
}

/// CPU-side animation state of one falling-water surface.
///
/// The frame updater writes `time` every tick; a render-sync system pushes
/// these scalars into the material uniforms afterwards. Keeping the scalars
/// on the component keeps the per-frame path free of asset lookups.
#[derive(Component, Debug, Clone)]
pub struct WaterfallSurface {
    /// Shared shader time value, set from absolute game time each frame.
    pub time: f32,
    /// Current opacity scalar.
    pub opacity: f32,
    /// Whether the surface has been switched to the alpha-blended path.
    pub translucent: bool,
    /// Material carrying this surface's uniforms.
    pub material: Handle<WaterfallMaterial>,
}

fn color_to_vec4(color: Color) -> Vec4 {
    Vec4::from_array(color.to_linear().to_f32_array())
}

fn build_material(params: &WaterfallParams, height: f32) -> WaterfallMaterial {
    let double_sided = height < 0.0 || params.shape.always_double_sided();
    ExtendedMaterial {
        base: StandardMaterial {
            base_color: Color::WHITE,
            perceptual_roughness: 0.2,
            cull_mode: if double_sided { None } else { Some(Face::Back) },
            double_sided,
            ..default()
        },
        extension: WaterfallMaterialExtension {
            uniform: WaterfallUniform {
                top_dark_color: color_to_vec4(params.top_dark),
                bottom_dark_color: color_to_vec4(params.bottom_dark),
                top_light_color: color_to_vec4(params.top_light),
                bottom_light_color: color_to_vec4(params.bottom_light),
                foam_color: color_to_vec4(params.foam_color),
                time: 0.0,
                speed: params.speed,
                opacity: params.opacity,
            },
        },
    }
}

/// Spawns the surface entity (and foam emitter entity, when requested) for
/// one waterfall as children of `host`.
///
/// Returns the surface entity and the emitter entity, if one was created.
/// Spheres never get foam; they have no impact line.
pub fn spawn_waterfall(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    standard_materials: &mut Assets<StandardMaterial>,
    materials: &mut Assets<WaterfallMaterial>,
    host: Entity,
    params: &WaterfallParams,
    square_size: f32,
) -> (Entity, Option<Entity>) {
    let radius = params.diameter * square_size / 2.0;
    let height = params.height * square_size;

    let mesh = meshes.add(params.shape.build_mesh(radius, height));
    let material = materials.add(build_material(params, height));

    // Shift the body so its base sits at the host origin; upward falls hang
    // below it instead.
    let body_y = if height < 0.0 {
        -height * 0.55
    } else {
        height * 0.45
    };

    let surface = commands
        .spawn((
            WaterfallSurface {
                time: 0.0,
                opacity: params.opacity,
                translucent: false,
                material: material.clone(),
            },
            Mesh3d(mesh),
            MeshMaterial3d(material),
            Transform::from_xyz(0.0, body_y, 0.0),
            ChildOf(host),
        ))
        .id();

    let emitter = if params.add_foam && params.shape.supports_foam() {
        let foam_mesh = meshes.add(Sphere::new(1.0));
        let foam_material = standard_materials.add(StandardMaterial {
            base_color: params.foam_color,
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            ..default()
        });
        // Upward falls emit foam at the top of the column, where the water
        // lands.
        let emitter_y = if height < 0.0 { -height } else { 0.0 };
        Some(
            commands
                .spawn((
                    FoamEmitter::new(radius, height, params.shape),
                    FoamVisual {
                        mesh: foam_mesh,
                        material: foam_material,
                    },
                    Transform::from_xyz(0.0, emitter_y, 0.0),
                    Visibility::default(),
                    ChildOf(host),
                ))
                .id(),
        )
    } else {
        None
    };

    (surface, emitter)
}

/// System that mirrors surface scalars into the material uniforms.
///
/// Runs outside the fixed-cadence updater; only surfaces whose component
/// changed this frame are touched.
pub fn push_surface_uniforms(
    mut materials: ResMut<Assets<WaterfallMaterial>>,
    surfaces: Query<&WaterfallSurface, Changed<WaterfallSurface>>,
) {
    for surface in surfaces.iter() {
        let Some(material) = materials.get_mut(&surface.material) else {
            continue;
        };
        material.extension.uniform.time = surface.time;
        material.extension.uniform.opacity = surface.opacity;
        if surface.translucent {
            material.base.alpha_mode = AlphaMode::Blend;
        }
    }
}
