//! Per-map index of active waterfall effects.
//!
//! The registry tracks which surfaces and foam emitters are live on the
//! currently loaded map. It holds plain `Entity` ids, not ownership: the
//! scene graph owns the actual entities, and presence in the registry is the
//! single source of truth for "this host has a waterfall". Entries are never
//! explicitly unregistered; they disappear either when the liveness sweep
//! notices their entity left the scene graph, or when the active map changes
//! and the whole registry is reset.

use bevy::prelude::*;

/// Identity of the map the host game is currently displaying.
///
/// The host sets `root` to the map's root entity once the map is fully
/// loaded, and back to `None` during loads and transitions. While it is
/// `None` the waterfall frame updater does nothing.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct ActiveMap {
    /// Root entity of the loaded map scene, if any.
    pub root: Option<Entity>,
}

/// One registered falling-water surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceEntry {
    /// Host object the effect is attached to.
    pub host: Entity,
    /// The surface entity carrying mesh, material and shader state.
    pub surface: Entity,
}

/// One registered foam emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmitterEntry {
    /// Host object the effect is attached to.
    pub host: Entity,
    /// The emitter entity carrying the emission scheduler state.
    pub emitter: Entity,
}

/// Registry of all waterfall effects on the active map.
#[derive(Resource, Debug, Default)]
pub struct EffectRegistry {
    map: Option<Entity>,
    surfaces: Vec<SurfaceEntry>,
    emitters: Vec<EmitterEntry>,
    /// Game-time cursor of the last frame update, for delta computation.
    last_time: Option<f32>,
}

impl EffectRegistry {
    /// Adopts `new_map` as the active map. If it differs from the current
    /// one, both collections are cleared and the frame-time cursor is reset
    /// before anything can be inserted for the new map. Calling this again
    /// with the same map is a no-op.
    pub fn on_map_changed(&mut self, new_map: Entity) {
        if self.map == Some(new_map) {
            return;
        }
        if !self.surfaces.is_empty() || !self.emitters.is_empty() {
            debug!(
                "Map changed, dropping {} surfaces and {} emitters",
                self.surfaces.len(),
                self.emitters.len()
            );
        }
        self.surfaces.clear();
        self.emitters.clear();
        self.last_time = None;
        self.map = Some(new_map);
    }

    /// Registers a surface for `host` on `map`. Insertion order is preserved.
    ///
    /// Adopts `map` first, so stale entries from a previous map are cleared
    /// before the insert and a later adoption of the same map can never wipe
    /// the entry it belongs to.
    pub fn register_surface(&mut self, map: Entity, host: Entity, surface: Entity) {
        self.on_map_changed(map);
        self.surfaces.push(SurfaceEntry { host, surface });
    }

    /// Registers a foam emitter for `host` on `map`. Insertion order is
    /// preserved. Adopts `map` first, like [`Self::register_surface`].
    pub fn register_emitter(&mut self, map: Entity, host: Entity, emitter: Entity) {
        self.on_map_changed(map);
        self.emitters.push(EmitterEntry { host, emitter });
    }

    /// Advances the frame-time cursor to `now` and returns the elapsed game
    /// time since the previous frame. The first frame after a map change
    /// sees a zero delta.
    pub fn begin_frame(&mut self, now: f32) -> f32 {
        let delta = match self.last_time {
            Some(previous) => now - previous,
            None => 0.0,
        };
        self.last_time = Some(now);
        delta
    }

    /// Registered surfaces, in insertion order.
    pub fn surfaces(&self) -> impl Iterator<Item = &SurfaceEntry> {
        self.surfaces.iter()
    }

    /// Registered emitters, in insertion order.
    pub fn emitters(&self) -> impl Iterator<Item = &EmitterEntry> {
        self.emitters.iter()
    }

    /// Looks up the surface registered for `host`, if any.
    pub fn surface_for(&self, host: Entity) -> Option<&SurfaceEntry> {
        self.surfaces.iter().find(|entry| entry.host == host)
    }

    /// Keeps only the surfaces for which `predicate` holds, preserving the
    /// relative order of survivors.
    pub fn retain_surfaces(&mut self, predicate: impl FnMut(&SurfaceEntry) -> bool) {
        self.surfaces.retain(predicate);
    }

    /// Keeps only the emitters for which `predicate` holds, preserving the
    /// relative order of survivors.
    pub fn retain_emitters(&mut self, predicate: impl FnMut(&EmitterEntry) -> bool) {
        self.emitters.retain(predicate);
    }

    /// Number of registered surfaces.
    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    /// Number of registered emitters.
    pub fn emitter_count(&self) -> usize {
        self.emitters.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entities(world: &mut World, n: usize) -> Vec<Entity> {
        (0..n).map(|_| world.spawn_empty().id()).collect()
    }

    #[test]
    fn test_map_change_clears_registry() {
        let mut world = World::new();
        let ids = entities(&mut world, 4);
        let mut registry = EffectRegistry::default();

        registry.register_surface(ids[0], ids[2], ids[3]);
        registry.register_emitter(ids[0], ids[2], ids[3]);
        assert_eq!(registry.surface_count(), 1);

        registry.on_map_changed(ids[1]);
        assert_eq!(registry.surface_count(), 0, "New map clears surfaces");
        assert_eq!(registry.emitter_count(), 0, "New map clears emitters");
    }

    #[test]
    fn test_registration_adopts_its_map_before_inserting() {
        let mut world = World::new();
        let ids = entities(&mut world, 4);
        let (old_map, new_map, host, surface) = (ids[0], ids[1], ids[2], ids[3]);
        let mut registry = EffectRegistry::default();

        // Registry is still tracking the old map when an effect is created
        // for the newly active one.
        registry.on_map_changed(old_map);
        registry.register_surface(new_map, host, surface);
        assert_eq!(registry.surface_count(), 1);

        // The next frame tick adopts the new map too; the entry belongs to
        // it and must survive.
        registry.on_map_changed(new_map);
        assert_eq!(
            registry.surface_count(),
            1,
            "A surface created for the new map must survive the registry's \
             adoption of that map"
        );
    }

    #[test]
    fn test_map_change_is_idempotent() {
        let mut world = World::new();
        let ids = entities(&mut world, 3);
        let mut registry = EffectRegistry::default();

        registry.register_surface(ids[0], ids[1], ids[2]);
        registry.begin_frame(5.0);

        registry.on_map_changed(ids[0]);
        assert_eq!(registry.surface_count(), 1, "Same map keeps entries");
        assert_eq!(
            registry.begin_frame(6.0),
            1.0,
            "Same map keeps the time cursor"
        );
    }

    #[test]
    fn test_map_change_resets_time_cursor() {
        let mut world = World::new();
        let ids = entities(&mut world, 2);
        let mut registry = EffectRegistry::default();

        registry.on_map_changed(ids[0]);
        registry.begin_frame(100.0);
        registry.on_map_changed(ids[1]);
        assert_eq!(
            registry.begin_frame(200.0),
            0.0,
            "First frame on a new map must see a zero delta"
        );
        assert_eq!(registry.begin_frame(200.5), 0.5);
    }

    #[test]
    fn test_retain_preserves_survivor_order() {
        let mut world = World::new();
        let ids = entities(&mut world, 5);
        let mut registry = EffectRegistry::default();

        let (a, b, c) = (ids[1], ids[2], ids[3]);
        registry.register_surface(ids[0], ids[4], a);
        registry.register_surface(ids[0], ids[4], b);
        registry.register_surface(ids[0], ids[4], c);

        // b's scene node went away.
        registry.retain_surfaces(|entry| entry.surface != b);

        let survivors: Vec<Entity> = registry.surfaces().map(|e| e.surface).collect();
        assert_eq!(survivors, vec![a, c], "Sweep keeps survivors in order");
    }

    #[test]
    fn test_surface_for_host_lookup() {
        let mut world = World::new();
        let ids = entities(&mut world, 4);
        let mut registry = EffectRegistry::default();

        registry.register_surface(ids[0], ids[1], ids[2]);

        assert_eq!(registry.surface_for(ids[1]).unwrap().surface, ids[2]);
        assert!(
            registry.surface_for(ids[3]).is_none(),
            "Unknown host has no surface"
        );
    }
}
