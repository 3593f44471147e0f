use std::sync::atomic::{AtomicU64, Ordering};

use models::v1::IntentionKind;

use super::{Animation, AnimationMap, AnimationUpdate, Vec2};
use crate::{CardId, EnemyId, GameTime, Health};

static COUNTER: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u64);

impl EntityId {
    pub fn new() -> Self {
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for EntityId {
    fn default() -> Self {
        EntityId::new()
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

impl std::fmt::Debug for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EntityId(0x{:x})", self.0)
    }
}

/// The animatable channels of an entity.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Visual {
    pub position: Vec2,
    pub alpha: f32,
    pub scale: f32,
}

impl Default for Visual {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            alpha: 1.0,
            scale: 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum EntityKind {
    Card {
        card: CardId,
        name: String,
    },
    Enemy {
        enemy: EnemyId,
        name: String,
        health: Health,
        block: u32,
        intention: Option<IntentionKind>,
    },
    Effect {
        text: String,
    },
    Background,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Card { card, name } => write!(f, "Card<{name} {card}>"),
            EntityKind::Enemy { enemy, name, .. } => write!(f, "Enemy<{name} {enemy}>"),
            EntityKind::Effect { text } => write!(f, "Effect<{text}>"),
            EntityKind::Background => write!(f, "Background"),
        }
    }
}

#[derive(Debug)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    /// Opaque asset handle, never interpreted here.
    pub sprite: String,
    pub visual: Visual,
    pub draw_priority: i32,
    pub active: bool,
    pub animations: AnimationMap,
    destroy_requested_at: Option<GameTime>,
    registered: bool,
}

impl Entity {
    pub fn new(kind: EntityKind, sprite: impl Into<String>) -> Self {
        Self::with_id(EntityId::new(), kind, sprite)
    }

    pub fn with_id(id: EntityId, kind: EntityKind, sprite: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            sprite: sprite.into(),
            visual: Visual::default(),
            draw_priority: 0,
            active: true,
            animations: AnimationMap::default(),
            destroy_requested_at: None,
            registered: false,
        }
    }

    pub fn at(mut self, position: Vec2) -> Self {
        self.visual.position = position;
        self
    }

    pub fn with_visual(mut self, visual: Visual) -> Self {
        self.visual = visual;
        self
    }

    pub fn with_draw_priority(mut self, draw_priority: i32) -> Self {
        self.draw_priority = draw_priority;
        self
    }

    pub fn is_registered(&self) -> bool {
        self.registered
    }

    pub(crate) fn mark_registered(&mut self) {
        self.registered = true;
    }

    pub fn awaiting_destruction(&self) -> bool {
        self.destroy_requested_at.is_some()
    }

    pub fn destroy_requested_at(&self) -> Option<GameTime> {
        self.destroy_requested_at
    }

    /// Marks the entity for the next sweep. The first request wins.
    pub fn request_destroy(&mut self, now: GameTime) {
        if self.destroy_requested_at.is_none() {
            self.destroy_requested_at = Some(now);
        }
    }

    pub fn play_animation(&mut self, priority: i32, animation: Animation) -> Option<Animation> {
        self.animations.play(priority, animation)
    }

    pub fn update(&mut self, dt: f64) -> AnimationUpdate {
        assert!(
            self.registered,
            "entity {} ({}) updated before it was registered",
            self.id, self.kind
        );
        self.animations.update(dt, &mut self.visual)
    }
}

/// Builds entities for [`super::EntityRegistry::instantiate`].
pub trait EntityFactory {
    fn create(&mut self) -> Entity;

    /// Runs once, right after the entity was registered.
    fn on_initialized(&mut self, _entity: &mut Entity) {}
}
