//! Fixed-cadence frame update for all waterfall effects.
//!
//! One system drives the whole per-frame path: map-change detection, foam
//! emission scheduling, and pushing the shared game time into every
//! registered surface. Particle births are emitted as [`FoamBirth`] events
//! and materialized by [`crate::particle::spawn_foam_particles`] immediately
//! after.

use bevy::prelude::*;

use crate::config::WaterfallSettings;
use crate::emitter::FoamEmitter;
use crate::registry::{ActiveMap, EffectRegistry};
use crate::surface::WaterfallSurface;

/// A foam particle birth scheduled this frame.
#[derive(Event, Debug, Clone, Copy)]
pub struct FoamBirth {
    /// Emitter entity the particle belongs to.
    pub emitter: Entity,
    /// Spawn position relative to the emitter origin.
    pub offset: Vec3,
    /// Visual scale in world units.
    pub size: f32,
    /// Seconds until expiry.
    pub lifetime: f32,
}

/// Per-frame waterfall update, on `FixedUpdate` (nominal 16 ms).
///
/// No-op while no map is active. Otherwise, strictly in order: adopt the
/// active map (clearing the registry on a change, before anything else can
/// touch stale entries), compute the game-time delta, advance every
/// registered emitter, then stamp every registered surface with the absolute
/// game time so all surfaces stay phase-locked. Entries whose entity is
/// already gone are skipped; the sweep reclaims them.
pub fn update_waterfalls(
    time: Res<Time>,
    active_map: Res<ActiveMap>,
    settings: Res<WaterfallSettings>,
    mut registry: ResMut<EffectRegistry>,
    mut emitters: Query<&mut FoamEmitter>,
    mut surfaces: Query<&mut WaterfallSurface>,
    mut births: EventWriter<FoamBirth>,
) {
    let Some(map) = active_map.root else {
        return;
    };
    registry.on_map_changed(map);

    let now = time.elapsed_secs();
    let delta = registry.begin_frame(now);

    let mut rng = rand::thread_rng();
    for entry in registry.emitters() {
        let Ok(mut emitter) = emitters.get_mut(entry.emitter) else {
            continue;
        };
        if let Some(birth) = emitter.advance(delta, settings.square_size, &mut rng) {
            births.write(FoamBirth {
                emitter: entry.emitter,
                offset: birth.offset,
                size: birth.size,
                lifetime: birth.lifetime,
            });
        }
    }

    for entry in registry.surfaces() {
        let Ok(mut surface) = surfaces.get_mut(entry.surface) else {
            continue;
        };
        surface.time = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::WaterfallShape;
    use bevy::ecs::system::RunSystemOnce;
    use std::time::Duration;

    fn test_world() -> (World, Entity) {
        let mut world = World::new();
        world.init_resource::<EffectRegistry>();
        world.init_resource::<Events<FoamBirth>>();
        world.insert_resource(WaterfallSettings {
            square_size: 1.0,
            ..Default::default()
        });
        world.insert_resource(Time::<()>::default());
        let map = world.spawn_empty().id();
        world.insert_resource(ActiveMap { root: Some(map) });
        (world, map)
    }

    fn drain_births(world: &mut World) -> Vec<FoamBirth> {
        world.resource_mut::<Events<FoamBirth>>().drain().collect()
    }

    #[test]
    fn test_frame_updater_drives_emitter_and_surface_time() {
        let (mut world, map) = test_world();
        let host = world.spawn_empty().id();
        let emitter = world
            .spawn(FoamEmitter::new(2.0, 4.0, WaterfallShape::Cylinder))
            .id();
        let surface = world
            .spawn(WaterfallSurface {
                time: 0.0,
                opacity: 1.0,
                translucent: false,
                material: Handle::default(),
            })
            .id();
        {
            let mut registry = world.resource_mut::<EffectRegistry>();
            registry.register_emitter(map, host, emitter);
            registry.register_surface(map, host, surface);
        }

        // First tick establishes the time cursor; delta is zero, no birth.
        world.run_system_once(update_waterfalls).unwrap();
        assert!(drain_births(&mut world).is_empty());

        world
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(1000));
        world.run_system_once(update_waterfalls).unwrap();

        let births = drain_births(&mut world);
        assert_eq!(births.len(), 1, "One second at radius 2 must birth foam");
        assert_eq!(births[0].emitter, emitter);

        let elapsed = world.resource::<Time>().elapsed_secs();
        let surface_time = world.get::<WaterfallSurface>(surface).unwrap().time;
        assert_eq!(
            surface_time, elapsed,
            "Surface time must equal the last supplied game time"
        );
    }

    #[test]
    fn test_no_map_means_no_work() {
        let (mut world, map) = test_world();
        world.insert_resource(ActiveMap { root: None });
        let host = world.spawn_empty().id();
        let emitter = world
            .spawn(FoamEmitter::new(2.0, 4.0, WaterfallShape::Cylinder))
            .id();
        world
            .resource_mut::<EffectRegistry>()
            .register_emitter(map, host, emitter);

        world
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(1000));
        world.run_system_once(update_waterfalls).unwrap();
        world
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(1000));
        world.run_system_once(update_waterfalls).unwrap();

        assert!(
            drain_births(&mut world).is_empty(),
            "Nothing happens while no map is active"
        );
    }

    #[test]
    fn test_map_change_clears_before_update() {
        let (mut world, map) = test_world();
        let host = world.spawn_empty().id();
        let emitter = world
            .spawn(FoamEmitter::new(2.0, 4.0, WaterfallShape::Cylinder))
            .id();
        world
            .resource_mut::<EffectRegistry>()
            .register_emitter(map, host, emitter);
        world.run_system_once(update_waterfalls).unwrap();

        // Switch maps; the stale emitter entry must be dropped before the
        // next update touches it.
        let new_map = world.spawn_empty().id();
        world.insert_resource(ActiveMap {
            root: Some(new_map),
        });
        world
            .resource_mut::<Time>()
            .advance_by(Duration::from_millis(1000));
        world.run_system_once(update_waterfalls).unwrap();

        assert!(drain_births(&mut world).is_empty());
        assert_eq!(world.resource::<EffectRegistry>().emitter_count(), 0);
    }
}
