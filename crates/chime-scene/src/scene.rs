use std::any::TypeId;
use std::collections::HashMap;
use std::time::Duration;

use chime_core::{Clock, GameTime, TimerHandle, TimerQueue, Transform};
use tracing::debug;

use crate::component::{Component, ComponentStorage, SparseSet};
use crate::error::SceneError;
use crate::object::{ObjectId, ObjectSlots};
use crate::resource::Resources;

/// Display name attached to every scene object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name(pub String);

/// The container for all scene objects, their components, shared resources
/// and the game clock.
///
/// Every object spawned through [`Scene::spawn`] carries a [`Name`] and a
/// [`Transform`]. Objects can be destroyed immediately or after a delay
/// measured in scaled game time, so a delayed destroy does not progress while
/// the game is paused.
pub struct Scene {
    slots: ObjectSlots,
    components: HashMap<TypeId, Box<dyn ComponentStorage>>,
    resources: Resources,
    time: GameTime,
    pending_destroy: TimerQueue<ObjectId>,
    destroy_timers: HashMap<ObjectId, TimerHandle>,
}

impl Scene {
    pub fn new(time: GameTime) -> Self {
        Self {
            slots: ObjectSlots::new(),
            components: HashMap::new(),
            resources: Resources::new(),
            time,
            pending_destroy: TimerQueue::new(),
            destroy_timers: HashMap::new(),
        }
    }

    // ---- Object lifecycle ----

    /// Spawn a named object at the given transform.
    pub fn spawn(&mut self, name: impl Into<String>, transform: Transform) -> ObjectId {
        let id = self.slots.allocate();
        self.storage_mut::<Name>().insert(id.index, Name(name.into()));
        self.storage_mut::<Transform>().insert(id.index, transform);
        id
    }

    /// Spawn a named object with one extra component already attached.
    pub fn spawn_with<T: Component>(&mut self, name: impl Into<String>, transform: Transform, component: T) -> ObjectId {
        let id = self.spawn(name, transform);
        self.storage_mut::<T>().insert(id.index, component);
        id
    }

    /// Destroy an object right away, removing all of its components and any
    /// pending delayed destroy. Returns `false` if it was already gone.
    pub fn destroy(&mut self, id: ObjectId) -> bool {
        if !self.slots.free(id) {
            return false;
        }
        for storage in self.components.values_mut() {
            storage.remove(id.index);
        }
        if let Some(handle) = self.destroy_timers.remove(&id) {
            self.pending_destroy.cancel(handle);
        }
        debug!("Destroyed scene object {}", id);
        true
    }

    /// Destroy an object once `delay` of scaled game time has passed.
    /// Replaces any earlier delayed destroy for the same object.
    pub fn destroy_after(&mut self, id: ObjectId, delay: Duration) -> Result<TimerHandle, SceneError> {
        if !self.slots.is_alive(id) {
            return Err(SceneError::DeadObject(id));
        }
        self.cancel_destroy(id);
        let handle = self.pending_destroy.once(delay, Clock::Scaled, id);
        self.destroy_timers.insert(id, handle);
        Ok(handle)
    }

    /// Cancel a pending delayed destroy. Returns `true` if one was pending.
    pub fn cancel_destroy(&mut self, id: ObjectId) -> bool {
        match self.destroy_timers.remove(&id) {
            Some(handle) => self.pending_destroy.cancel(handle),
            None => false,
        }
    }

    /// Scaled game time left before a pending delayed destroy fires.
    pub fn pending_destroy(&self, id: ObjectId) -> Option<Duration> {
        let handle = self.destroy_timers.get(&id)?;
        self.pending_destroy.remaining(*handle)
    }

    pub fn is_alive(&self, id: ObjectId) -> bool {
        self.slots.is_alive(id)
    }

    /// Number of live objects.
    pub fn object_count(&self) -> usize {
        self.slots.len()
    }

    pub fn name(&self, id: ObjectId) -> Option<&str> {
        self.get::<Name>(id).map(|n| n.0.as_str())
    }

    pub fn transform(&self, id: ObjectId) -> Option<&Transform> {
        self.get::<Transform>(id)
    }

    pub fn transform_mut(&mut self, id: ObjectId) -> Option<&mut Transform> {
        self.get_mut::<Transform>(id)
    }

    // ---- Frame ----

    /// Advance the game clock by the raw frame delta and run any delayed
    /// destroys that came due. Returns the number of objects destroyed.
    pub fn advance(&mut self, raw_delta: f32) -> usize {
        self.time.update(raw_delta);
        let due = self.pending_destroy.tick(&self.time);
        let mut destroyed = 0;
        for id in due {
            self.destroy_timers.remove(&id);
            if self.destroy(id) {
                destroyed += 1;
            }
        }
        destroyed
    }

    pub fn time(&self) -> &GameTime {
        &self.time
    }

    pub fn time_mut(&mut self) -> &mut GameTime {
        &mut self.time
    }

    // ---- Components ----

    fn storage_mut<T: Component>(&mut self) -> &mut SparseSet<T> {
        self.components
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(SparseSet::<T>::new()))
            .as_any_mut()
            .downcast_mut::<SparseSet<T>>()
            .expect("component storage registered under the wrong type")
    }

    fn storage<T: Component>(&self) -> Option<&SparseSet<T>> {
        self.components
            .get(&TypeId::of::<T>())
            .and_then(|s| s.as_any().downcast_ref::<SparseSet<T>>())
    }

    /// Attach a component, replacing any existing one of the same type.
    pub fn insert<T: Component>(&mut self, id: ObjectId, component: T) -> Result<(), SceneError> {
        if !self.slots.is_alive(id) {
            return Err(SceneError::DeadObject(id));
        }
        self.storage_mut::<T>().insert(id.index, component);
        Ok(())
    }

    pub fn get<T: Component>(&self, id: ObjectId) -> Option<&T> {
        if !self.slots.is_alive(id) {
            return None;
        }
        self.storage::<T>()?.get(id.index)
    }

    pub fn get_mut<T: Component>(&mut self, id: ObjectId) -> Option<&mut T> {
        if !self.slots.is_alive(id) {
            return None;
        }
        self.components
            .get_mut(&TypeId::of::<T>())?
            .as_any_mut()
            .downcast_mut::<SparseSet<T>>()?
            .get_mut(id.index)
    }

    /// Detach a component. Returns `true` if it was present.
    pub fn remove<T: Component>(&mut self, id: ObjectId) -> bool {
        if !self.slots.is_alive(id) {
            return false;
        }
        self.components
            .get_mut(&TypeId::of::<T>())
            .is_some_and(|s| s.remove(id.index))
    }

    pub fn has<T: Component>(&self, id: ObjectId) -> bool {
        self.get::<T>(id).is_some()
    }

    /// Iterate over every live object that has a `T`.
    pub fn iter<T: Component>(&self) -> impl Iterator<Item = (ObjectId, &T)> + '_ {
        self.storage::<T>()
            .into_iter()
            .flat_map(|storage| storage.iter())
            .filter_map(move |(index, component)| self.slots.id_at(index).map(|id| (id, component)))
    }

    // ---- Resources ----

    /// Insert a shared resource, returning the one it replaced.
    pub fn insert_resource<T: 'static + Send + Sync>(&mut self, value: T) -> Option<T> {
        self.resources.insert(value)
    }

    pub fn resource<T: 'static + Send + Sync>(&self) -> Option<&T> {
        self.resources.get::<T>()
    }

    pub fn resource_mut<T: 'static + Send + Sync>(&mut self) -> Option<&mut T> {
        self.resources.get_mut::<T>()
    }

    pub fn remove_resource<T: 'static + Send + Sync>(&mut self) -> Option<T> {
        self.resources.remove::<T>()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(GameTime::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chime_core::Vec3;

    #[derive(Debug, Clone, PartialEq)]
    struct Volume(f32);

    #[test]
    fn spawn_attaches_name_and_transform() {
        let mut scene = Scene::default();
        let id = scene.spawn("speaker", Transform::from_position(Vec3::X));
        assert!(scene.is_alive(id));
        assert_eq!(scene.name(id), Some("speaker"));
        assert_eq!(scene.transform(id).unwrap().position, Vec3::X);
        assert_eq!(scene.object_count(), 1);
    }

    #[test]
    fn spawn_with_attaches_component() {
        let mut scene = Scene::default();
        let id = scene.spawn_with("knob", Transform::default(), Volume(0.2));
        assert_eq!(scene.get::<Volume>(id), Some(&Volume(0.2)));
        assert_eq!(scene.name(id), Some("knob"));
    }

    #[test]
    fn destroy_removes_components() {
        let mut scene = Scene::default();
        let id = scene.spawn("a", Transform::default());
        scene.insert(id, Volume(0.5)).unwrap();
        assert!(scene.destroy(id));
        assert!(!scene.destroy(id));
        assert!(!scene.is_alive(id));
        assert_eq!(scene.iter::<Volume>().count(), 0);
        assert_eq!(scene.object_count(), 0);
    }

    #[test]
    fn insert_on_dead_object_fails() {
        let mut scene = Scene::default();
        let id = scene.spawn("a", Transform::default());
        scene.destroy(id);
        assert_eq!(scene.insert(id, Volume(1.0)), Err(SceneError::DeadObject(id)));
    }

    #[test]
    fn stale_id_does_not_see_new_occupant() {
        let mut scene = Scene::default();
        let old = scene.spawn("old", Transform::default());
        scene.destroy(old);
        let new = scene.spawn("new", Transform::default());
        assert_eq!(old.index(), new.index());
        assert_eq!(scene.name(old), None);
        assert_eq!(scene.name(new), Some("new"));
        assert!(!scene.destroy(old));
        assert!(scene.is_alive(new));
    }

    #[test]
    fn component_mutation_and_removal() {
        let mut scene = Scene::default();
        let id = scene.spawn("a", Transform::default());
        scene.insert(id, Volume(0.0)).unwrap();
        scene.get_mut::<Volume>(id).unwrap().0 = 0.75;
        assert_eq!(scene.get::<Volume>(id), Some(&Volume(0.75)));
        assert!(scene.remove::<Volume>(id));
        assert!(!scene.has::<Volume>(id));
    }

    #[test]
    fn iter_yields_only_objects_with_component() {
        let mut scene = Scene::default();
        let a = scene.spawn("a", Transform::default());
        let _b = scene.spawn("b", Transform::default());
        scene.insert(a, Volume(1.0)).unwrap();
        let found: Vec<_> = scene.iter::<Volume>().map(|(id, _)| id).collect();
        assert_eq!(found, vec![a]);
    }

    #[test]
    fn delayed_destroy_runs_on_game_time() {
        let mut scene = Scene::default();
        let id = scene.spawn("a", Transform::default());
        scene.destroy_after(id, Duration::from_millis(300)).unwrap();
        let left = scene.pending_destroy(id).unwrap();
        assert_eq!(left, Duration::from_millis(300));

        assert_eq!(scene.advance(0.2), 0);
        assert!(scene.is_alive(id));
        assert_eq!(scene.advance(0.2), 1);
        assert!(!scene.is_alive(id));
        assert_eq!(scene.pending_destroy(id), None);
    }

    #[test]
    fn delayed_destroy_waits_while_paused() {
        let mut scene = Scene::default();
        let id = scene.spawn("a", Transform::default());
        scene.destroy_after(id, Duration::from_millis(100)).unwrap();
        scene.time_mut().pause();
        for _ in 0..20 {
            scene.advance(0.1);
        }
        assert!(scene.is_alive(id));
        scene.time_mut().resume();
        scene.advance(0.2);
        assert!(!scene.is_alive(id));
    }

    #[test]
    fn immediate_destroy_cancels_delayed_destroy() {
        let mut scene = Scene::default();
        let id = scene.spawn("a", Transform::default());
        scene.destroy_after(id, Duration::from_millis(100)).unwrap();
        scene.destroy(id);
        let reused = scene.spawn("b", Transform::default());
        assert_eq!(scene.advance(0.2), 0);
        assert!(scene.is_alive(reused));
    }

    #[test]
    fn cancel_destroy_keeps_object() {
        let mut scene = Scene::default();
        let id = scene.spawn("a", Transform::default());
        scene.destroy_after(id, Duration::from_millis(100)).unwrap();
        assert!(scene.cancel_destroy(id));
        assert!(!scene.cancel_destroy(id));
        scene.advance(0.2);
        assert!(scene.is_alive(id));
    }

    #[test]
    fn resources_roundtrip() {
        let mut scene = Scene::default();
        scene.insert_resource(42u32);
        *scene.resource_mut::<u32>().unwrap() += 1;
        assert_eq!(scene.resource::<u32>(), Some(&43));
        assert_eq!(scene.remove_resource::<u32>(), Some(43));
        assert_eq!(scene.resource::<u32>(), None);
    }
}
