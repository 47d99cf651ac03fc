//! Waterfall surface material.
//!
//! Extends Bevy's StandardMaterial with the uniforms driving the falling
//! water animation: a shared time scalar, scroll speed, a four-color
//! gradient, the foam highlight color and an opacity scalar.

use bevy::{
    asset::Asset,
    pbr::{ExtendedMaterial, MaterialExtension, StandardMaterial},
    prelude::*,
    render::render_resource::{AsBindGroup, ShaderRef, ShaderType},
};

/// Uniform data for the waterfall shader.
///
/// `time` is absolute game time: every surface on a map receives the same
/// value each frame so their flow animations stay phase-locked.
#[derive(Clone, Copy, Debug, ShaderType)]
pub struct WaterfallUniform {
    /// Gradient color at the top of the fall, shaded band.
    pub top_dark_color: Vec4,
    /// Gradient color at the bottom of the fall, shaded band.
    pub bottom_dark_color: Vec4,
    /// Gradient color at the top of the fall, lit band.
    pub top_light_color: Vec4,
    /// Gradient color at the bottom of the fall, lit band.
    pub bottom_light_color: Vec4,
    /// Color of the foam streaks and the impact band.
    pub foam_color: Vec4,
    /// Absolute game time in seconds.
    pub time: f32,
    /// Downward scroll speed of the water pattern.
    pub speed: f32,
    /// Overall surface opacity; only honored once the surface is marked
    /// translucent.
    pub opacity: f32,
}

impl Default for WaterfallUniform {
    fn default() -> Self {
        Self {
            top_dark_color: Vec4::new(0.1, 0.3, 0.5, 1.0),
            bottom_dark_color: Vec4::new(0.05, 0.2, 0.4, 1.0),
            top_light_color: Vec4::new(0.4, 0.7, 0.9, 1.0),
            bottom_light_color: Vec4::new(0.3, 0.6, 0.8, 1.0),
            foam_color: Vec4::ONE,
            time: 0.0,
            speed: 1.0,
            opacity: 1.0,
        }
    }
}

/// Material extension that adds the waterfall uniforms.
#[derive(Asset, AsBindGroup, TypePath, Debug, Clone, Default)]
pub struct WaterfallMaterialExtension {
    #[uniform(100)]
    pub uniform: WaterfallUniform,
}

impl MaterialExtension for WaterfallMaterialExtension {
    fn fragment_shader() -> ShaderRef {
        "shaders/waterfall.wgsl".into()
    }
}

/// Type alias for the complete waterfall material.
pub type WaterfallMaterial = ExtendedMaterial<StandardMaterial, WaterfallMaterialExtension>;

/// Resource holding the waterfall shader handle.
///
/// The shader is requested once at startup; waterfall creation defers until
/// the asset server reports it loaded (see [`crate::commands`]).
#[derive(Resource)]
pub struct WaterfallShaders {
    /// Handle to the waterfall WGSL source.
    pub shader: Handle<Shader>,
}

/// Startup system kicking off the shader load.
pub fn load_waterfall_shaders(mut commands: Commands, asset_server: Res<AssetServer>) {
    let shader: Handle<Shader> = asset_server.load("shaders/waterfall.wgsl");
    commands.insert_resource(WaterfallShaders { shader });
    info!("Waterfall shader load started");
}
