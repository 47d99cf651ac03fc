//! External command surface: waterfall creation and opacity control.
//!
//! The host game sends [`CreateWaterfall`] and [`SetWaterfallOpacity`]
//! events. Creation can race the shader load and the host object's own
//! spawn, so requests go through a pending queue drained once per tick; each
//! drain re-checks readiness instead of re-scheduling callbacks. A request
//! from a map that is no longer active is dropped silently.

use bevy::prelude::*;

use crate::config::WaterfallSettings;
use crate::material::{WaterfallMaterial, WaterfallShaders};
use crate::registry::{ActiveMap, EffectRegistry};
use crate::surface::{spawn_waterfall, WaterfallParams, WaterfallSurface};

/// Request to attach a waterfall effect to `host`.
#[derive(Event, Debug, Clone)]
pub struct CreateWaterfall {
    /// Host entity the effect follows.
    pub host: Entity,
    /// Visual parameters of the waterfall.
    pub params: WaterfallParams,
}

/// Request to change the opacity of the waterfall registered for `host`.
/// Silently ignored when the host has no registered waterfall.
#[derive(Event, Debug, Clone, Copy)]
pub struct SetWaterfallOpacity {
    /// Host entity whose waterfall to adjust.
    pub host: Entity,
    /// New opacity scalar.
    pub opacity: f32,
}

/// What to do with a pending creation request this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Disposition {
    /// Everything is ready; build and register the effect.
    Build,
    /// Something is not ready yet; keep the request for the next tick.
    Defer,
    /// The request's map is gone; forget it.
    Drop,
}

fn classify(
    stamped_map: Entity,
    active_map: Option<Entity>,
    shader_ready: bool,
    host_alive: bool,
) -> Disposition {
    if active_map != Some(stamped_map) {
        return Disposition::Drop;
    }
    if !shader_ready || !host_alive {
        return Disposition::Defer;
    }
    Disposition::Build
}

struct PendingRequest {
    request: CreateWaterfall,
    /// Map that was active when the request arrived; the request dies with it.
    map: Entity,
}

/// Creation requests waiting for their readiness conditions.
#[derive(Resource, Default)]
pub struct PendingWaterfalls {
    queue: Vec<PendingRequest>,
}

impl PendingWaterfalls {
    /// Number of requests still waiting.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether no requests are waiting.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// System that enqueues new creation requests and drains the pending queue.
///
/// Runs once per tick. A request builds only when the shader has finished
/// loading, the host entity exists, and the map it was issued on is still
/// the active one.
#[allow(clippy::too_many_arguments)]
pub fn drain_waterfall_requests(
    mut commands: Commands,
    mut requests: EventReader<CreateWaterfall>,
    mut pending: ResMut<PendingWaterfalls>,
    active_map: Res<ActiveMap>,
    asset_server: Res<AssetServer>,
    shaders: Res<WaterfallShaders>,
    settings: Res<WaterfallSettings>,
    mut registry: ResMut<EffectRegistry>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut standard_materials: ResMut<Assets<StandardMaterial>>,
    mut materials: ResMut<Assets<WaterfallMaterial>>,
    hosts: Query<Entity>,
) {
    for request in requests.read() {
        match active_map.root {
            Some(map) => pending.queue.push(PendingRequest {
                request: request.clone(),
                map,
            }),
            None => debug!("Dropping waterfall request issued with no active map"),
        }
    }
    if pending.queue.is_empty() {
        return;
    }

    let shader_ready = asset_server.is_loaded_with_dependencies(&shaders.shader);
    let mut deferred = Vec::new();

    for item in pending.queue.drain(..) {
        let host = item.request.host;
        match classify(
            item.map,
            active_map.root,
            shader_ready,
            hosts.contains(host),
        ) {
            Disposition::Drop => {
                debug!("Dropping waterfall request for a stale map");
            }
            Disposition::Defer => deferred.push(item),
            Disposition::Build => {
                let (surface, emitter) = spawn_waterfall(
                    &mut commands,
                    &mut meshes,
                    &mut standard_materials,
                    &mut materials,
                    host,
                    &item.request.params,
                    settings.square_size,
                );
                registry.register_surface(item.map, host, surface);
                if let Some(emitter) = emitter {
                    registry.register_emitter(item.map, host, emitter);
                }
                info!(
                    "Created {:?} waterfall for host {:?}",
                    item.request.params.shape, host
                );
            }
        }
    }

    pending.queue = deferred;
}

/// System that applies opacity requests to registered surfaces.
///
/// Switching a surface's opacity also moves it onto the alpha-blended render
/// path, so partially transparent water sorts behind scene geometry.
pub fn apply_opacity_requests(
    mut requests: EventReader<SetWaterfallOpacity>,
    registry: Res<EffectRegistry>,
    mut surfaces: Query<&mut WaterfallSurface>,
) {
    for request in requests.read() {
        let Some(entry) = registry.surface_for(request.host) else {
            continue;
        };
        let Ok(mut surface) = surfaces.get_mut(entry.surface) else {
            continue;
        };
        surface.opacity = request.opacity;
        surface.translucent = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    #[test]
    fn test_classify_stale_map_drops() {
        let mut world = World::new();
        let old_map = world.spawn_empty().id();
        let new_map = world.spawn_empty().id();
        assert_eq!(
            classify(old_map, Some(new_map), true, true),
            Disposition::Drop
        );
        assert_eq!(classify(old_map, None, true, true), Disposition::Drop);
    }

    #[test]
    fn test_classify_not_ready_defers() {
        let mut world = World::new();
        let map = world.spawn_empty().id();
        assert_eq!(classify(map, Some(map), false, true), Disposition::Defer);
        assert_eq!(classify(map, Some(map), true, false), Disposition::Defer);
        assert_eq!(classify(map, Some(map), true, true), Disposition::Build);
    }

    #[test]
    fn test_opacity_on_unregistered_host_is_noop() {
        let mut world = World::new();
        world.init_resource::<EffectRegistry>();
        world.init_resource::<Events<SetWaterfallOpacity>>();

        let stranger = world.spawn_empty().id();
        world.send_event(SetWaterfallOpacity {
            host: stranger,
            opacity: 0.5,
        });
        // Must not panic, must not touch anything.
        world.run_system_once(apply_opacity_requests).unwrap();
    }

    #[test]
    fn test_opacity_marks_surface_translucent() {
        let mut world = World::new();
        world.init_resource::<EffectRegistry>();
        world.init_resource::<Events<SetWaterfallOpacity>>();

        let map = world.spawn_empty().id();
        let host = world.spawn_empty().id();
        let surface = world
            .spawn(WaterfallSurface {
                time: 0.0,
                opacity: 1.0,
                translucent: false,
                material: Handle::default(),
            })
            .id();
        world
            .resource_mut::<EffectRegistry>()
            .register_surface(map, host, surface);

        world.send_event(SetWaterfallOpacity { host, opacity: 0.4 });
        world.run_system_once(apply_opacity_requests).unwrap();

        let surface = world.get::<WaterfallSurface>(surface).unwrap();
        assert_eq!(surface.opacity, 0.4);
        assert!(surface.translucent, "Opacity change enables blending");
    }
}
