use std::collections::HashSet;

use indexmap::IndexMap;

use super::{Animation, Entity, EntityFactory, EntityId, EntityKind, Visual};
use crate::GameTime;

#[derive(Clone, Debug, PartialEq)]
pub struct RenderItem {
    pub id: EntityId,
    pub sprite: String,
    pub visual: Visual,
    pub draw_priority: i32,
}

impl From<&Entity> for RenderItem {
    fn from(entity: &Entity) -> Self {
        Self {
            id: entity.id,
            sprite: entity.sprite.clone(),
            visual: entity.visual,
            draw_priority: entity.draw_priority,
        }
    }
}

/// Read-only view of an entity for diagnostics and tests.
#[derive(Clone, Debug, PartialEq)]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub kind: EntityKind,
    pub visual: Visual,
    pub draw_priority: i32,
    pub active: bool,
    pub awaiting_destruction: bool,
    pub animation_slots: Vec<i32>,
}

impl From<&Entity> for EntitySnapshot {
    fn from(entity: &Entity) -> Self {
        Self {
            id: entity.id,
            kind: entity.kind.clone(),
            visual: entity.visual,
            draw_priority: entity.draw_priority,
            active: entity.active,
            awaiting_destruction: entity.awaiting_destruction(),
            animation_slots: entity.animations.priorities().collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LeakReport {
    pub id: EntityId,
    pub kind: EntityKind,
    pub destroy_requested_at: GameTime,
    pub detected_at: GameTime,
}

/// Owns every live entity. Destruction is deferred: [`EntityRegistry::destroy`]
/// only marks, [`EntityRegistry::sweep`] removes.
#[derive(Debug)]
pub struct EntityRegistry {
    entities: IndexMap<EntityId, Entity>,
    now: GameTime,
    leak_grace: f64,
    leaks: Vec<LeakReport>,
    reported: HashSet<EntityId>,
}

impl EntityRegistry {
    pub fn new(leak_grace: f64) -> Self {
        Self {
            entities: IndexMap::new(),
            now: GameTime::ZERO,
            leak_grace,
            leaks: Vec::new(),
            reported: HashSet::new(),
        }
    }

    pub fn now(&self) -> GameTime {
        self.now
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn instantiate<F: EntityFactory + ?Sized>(&mut self, factory: &mut F) -> EntityId {
        let id = self.register(factory.create());
        if let Some(entity) = self.entities.get_mut(&id) {
            factory.on_initialized(entity);
        }
        id
    }

    pub fn register(&mut self, mut entity: Entity) -> EntityId {
        assert!(
            !entity.is_registered() && !self.entities.contains_key(&entity.id),
            "entity {} ({}) registered twice",
            entity.id,
            entity.kind
        );
        entity.mark_registered();
        let id = entity.id;
        tracing::trace!(%id, kind = %entity.kind, "entity registered");
        self.entities.insert(id, entity);
        id
    }

    pub fn play_animation(
        &mut self,
        id: EntityId,
        priority: i32,
        animation: Animation,
    ) -> Option<Animation> {
        match self.entities.get_mut(&id) {
            Some(entity) => entity.play_animation(priority, animation),
            None => {
                tracing::warn!(%id, priority, "animation played on an unknown entity");
                None
            }
        }
    }

    pub fn destroy(&mut self, id: EntityId) -> bool {
        let now = self.now;
        match self.entities.get_mut(&id) {
            Some(entity) => {
                entity.request_destroy(now);
                true
            }
            None => false,
        }
    }

    /// Advances a single entity. Unknown ids are a caller bug.
    pub fn update_entity(&mut self, id: EntityId, dt: f64) {
        let now = self.now;
        let Some(entity) = self.entities.get_mut(&id) else {
            panic!("entity {id} is not registered");
        };
        if entity.update(dt).destroy_requested {
            entity.request_destroy(now);
        }
    }

    /// Advances every active entity that is not awaiting destruction and
    /// returns the frame's draw list, ordered by draw priority.
    pub fn update(&mut self, dt: f64) -> Vec<RenderItem> {
        self.now += dt;
        let ids: Vec<EntityId> = self
            .entities
            .values()
            .filter(|e| e.active && !e.awaiting_destruction())
            .map(|e| e.id)
            .collect();
        for id in ids {
            if self.entities.contains_key(&id) {
                self.update_entity(id, dt);
            }
        }
        self.detect_leaks();

        let mut frame: Vec<RenderItem> = self
            .entities
            .values()
            .filter(|e| e.active)
            .map(RenderItem::from)
            .collect();
        frame.sort_by_key(|item| item.draw_priority);
        frame
    }

    /// Removes every entity marked for destruction.
    pub fn sweep(&mut self) -> Vec<EntityId> {
        let marked: Vec<EntityId> = self
            .entities
            .values()
            .filter(|e| e.awaiting_destruction())
            .map(|e| e.id)
            .collect();
        for id in &marked {
            self.entities.shift_remove(id);
            self.reported.remove(id);
        }
        marked
    }

    pub fn leaks(&self) -> &[LeakReport] {
        &self.leaks
    }

    /// Hands over the reports gathered so far. An entity is still reported at
    /// most once, even after its report was taken.
    pub fn take_leaks(&mut self) -> Vec<LeakReport> {
        std::mem::take(&mut self.leaks)
    }

    pub fn snapshot(&self, id: EntityId) -> Option<EntitySnapshot> {
        self.entities.get(&id).map(EntitySnapshot::from)
    }

    pub fn snapshots(&self) -> Vec<EntitySnapshot> {
        self.entities.values().map(EntitySnapshot::from).collect()
    }

    pub fn clear(&mut self) {
        self.entities.clear();
        self.reported.clear();
    }

    fn detect_leaks(&mut self) {
        for entity in self.entities.values() {
            let Some(requested_at) = entity.destroy_requested_at() else {
                continue;
            };
            if (self.now - requested_at).seconds() <= self.leak_grace
                || self.reported.contains(&entity.id)
            {
                continue;
            }
            tracing::warn!(
                id = %entity.id,
                kind = %entity.kind,
                requested_at = %requested_at,
                now = %self.now,
                "entity still awaiting destruction, probable leak"
            );
            self.reported.insert(entity.id);
            self.leaks.push(LeakReport {
                id: entity.id,
                kind: entity.kind.clone(),
                destroy_requested_at: requested_at,
                detected_at: self.now,
            });
        }
    }
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new(3.0)
    }
}
