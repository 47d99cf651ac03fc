//! Bevy plugin wiring for the waterfall effect.

use bevy::{pbr::MaterialPlugin, prelude::*};

use crate::commands::{
    apply_opacity_requests, drain_waterfall_requests, CreateWaterfall, PendingWaterfalls,
    SetWaterfallOpacity,
};
use crate::config::WaterfallSettings;
use crate::material::{load_waterfall_shaders, WaterfallMaterial};
use crate::particle::{age_foam_particles, spawn_foam_particles};
use crate::registry::{ActiveMap, EffectRegistry};
use crate::surface::push_surface_uniforms;
use crate::sweep::{sweep_orphaned_effects, SweepTimer};
use crate::update::{update_waterfalls, FoamBirth};

/// Plugin that adds animated waterfall effects to the game.
///
/// This plugin:
/// - Registers the waterfall material and starts the shader load
/// - Listens for [`CreateWaterfall`] and [`SetWaterfallOpacity`] events
/// - Advances foam emission and surface animation time every fixed tick
/// - Periodically sweeps effects whose host object left the scene
///
/// The host game only has to keep [`ActiveMap`] pointing at the currently
/// loaded map root (or `None` while loading).
pub struct WaterfallPlugin;

impl Plugin for WaterfallPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(MaterialPlugin::<WaterfallMaterial>::default())
            .register_type::<WaterfallSettings>()
            .init_resource::<WaterfallSettings>()
            .init_resource::<ActiveMap>()
            .init_resource::<EffectRegistry>()
            .init_resource::<PendingWaterfalls>()
            .init_resource::<SweepTimer>()
            .add_event::<CreateWaterfall>()
            .add_event::<SetWaterfallOpacity>()
            .add_event::<FoamBirth>()
            .add_systems(Startup, load_waterfall_shaders)
            .add_systems(
                FixedUpdate,
                (update_waterfalls, spawn_foam_particles, age_foam_particles).chain(),
            )
            .add_systems(
                Update,
                (
                    drain_waterfall_requests,
                    apply_opacity_requests,
                    push_surface_uniforms,
                    sweep_orphaned_effects,
                ),
            );
    }
}
