use std::{collections::HashMap, sync::Arc};

use models::v1::CardDefinition;

use crate::{
    Animation, CARD_DISCARD_DURATION, CARD_DISCARD_PRIORITY, CARD_DRAW_DURATION,
    CARD_DRAW_PRIORITY, CardDisposition, CardId, CardInstance, Combat, CombatEvent,
    DAMAGE_NUMBER_DURATION, DEFAULT_ANIMATION_PRIORITY, DamageReport, EFFECT_DRAW_LAYER, EnemyId,
    EnemyInstance, Entity, EntityFactory, EntityId, EntityKind, EntityRegistry,
    HAND_DRAW_LAYER, HAND_REPOSITION_DURATION, HIT_FLASH_PRIORITY, RenderItem, ScreenLayout,
    Tween, Vec2, Visual,
};

struct CardEntityFactory<'a> {
    card: &'a CardInstance,
    from: Vec2,
}

impl EntityFactory for CardEntityFactory<'_> {
    fn create(&mut self) -> Entity {
        Entity::new(
            EntityKind::Card {
                card: self.card.id,
                name: self.card.definition.name.clone(),
            },
            self.card.definition.sprite.clone(),
        )
        .with_visual(Visual {
            position: self.from,
            alpha: 0.0,
            scale: 0.5,
        })
        .with_draw_priority(*HAND_DRAW_LAYER)
    }

    fn on_initialized(&mut self, entity: &mut Entity) {
        entity.play_animation(
            *CARD_DRAW_PRIORITY,
            Animation::new()
                .alpha(Tween::new(0.0, 1.0, *CARD_DRAW_DURATION))
                .scale(Tween::new(0.5, 1.0, *CARD_DRAW_DURATION)),
        );
    }
}

struct EnemyEntityFactory<'a> {
    enemy: &'a EnemyInstance,
    round: usize,
    at: Vec2,
}

impl EntityFactory for EnemyEntityFactory<'_> {
    fn create(&mut self) -> Entity {
        Entity::new(
            EntityKind::Enemy {
                enemy: self.enemy.id,
                name: self.enemy.name().to_string(),
                health: self.enemy.vitals.health,
                block: self.enemy.vitals.block,
                intention: Some(self.enemy.intention(self.round).kind()),
            },
            self.enemy.template.sprite.clone(),
        )
        .at(self.at)
    }

    fn on_initialized(&mut self, entity: &mut Entity) {
        entity.visual.alpha = 0.0;
        entity.play_animation(
            *DEFAULT_ANIMATION_PRIORITY,
            Animation::new().alpha(Tween::new(0.0, 1.0, *CARD_DRAW_DURATION)),
        );
    }
}

/// Floating text that drifts up, fades and removes itself.
struct FloatingTextFactory {
    text: String,
    at: Vec2,
}

impl EntityFactory for FloatingTextFactory {
    fn create(&mut self) -> Entity {
        Entity::new(
            EntityKind::Effect {
                text: self.text.clone(),
            },
            "",
        )
        .at(self.at)
        .with_draw_priority(*EFFECT_DRAW_LAYER)
    }

    fn on_initialized(&mut self, entity: &mut Entity) {
        let rise = self.at - Vec2::new(0.0, 60.0);
        entity.play_animation(
            *DEFAULT_ANIMATION_PRIORITY,
            Animation::new()
                .position(Tween::new(self.at, rise, *DAMAGE_NUMBER_DURATION))
                .alpha(Tween::new(1.0, 0.0, *DAMAGE_NUMBER_DURATION))
                .then_destroy(),
        );
    }
}

/// Turns combat events into entity operations on its own registry. Combat
/// rules never look at this state.
#[derive(Debug)]
pub struct CombatScene {
    pub registry: EntityRegistry,
    layout: ScreenLayout,
    cards: HashMap<CardId, EntityId>,
    hand: Vec<CardId>,
    enemies: HashMap<EnemyId, EntityId>,
    choices: Vec<EntityId>,
}

impl CombatScene {
    pub fn new(layout: ScreenLayout, leak_grace: f64) -> Self {
        Self {
            registry: EntityRegistry::new(leak_grace),
            layout,
            cards: HashMap::new(),
            hand: Vec::new(),
            enemies: HashMap::new(),
            choices: Vec::new(),
        }
    }

    pub fn card_entity(&self, card: CardId) -> Option<EntityId> {
        self.cards.get(&card).copied()
    }

    pub fn enemy_entity(&self, enemy: EnemyId) -> Option<EntityId> {
        self.enemies.get(&enemy).copied()
    }

    pub fn hand_order(&self) -> &[CardId] {
        &self.hand
    }

    pub fn choice_entities(&self) -> &[EntityId] {
        &self.choices
    }

    /// Marks everything on screen for destruction and lays out a new room.
    pub fn enter_room(&mut self, background: &str) {
        let ids: Vec<EntityId> = self.registry.snapshots().iter().map(|s| s.id).collect();
        for id in ids {
            self.registry.destroy(id);
        }
        self.cards.clear();
        self.hand.clear();
        self.enemies.clear();
        self.choices.clear();
        self.registry.register(
            Entity::new(EntityKind::Background, background)
                .at(Vec2::new(self.layout.width / 2.0, self.layout.height / 2.0))
                .with_draw_priority(i32::MIN),
        );
    }

    /// Spawns the enemies of a freshly started combat and replays its opening
    /// events.
    pub fn load_combat(&mut self, combat: &mut Combat) {
        let count = combat.enemies.len();
        for (slot, enemy) in combat.enemies.values().enumerate() {
            let mut factory = EnemyEntityFactory {
                enemy,
                round: combat.round,
                at: self.enemy_slot(slot, count),
            };
            let id = self.registry.instantiate(&mut factory);
            self.enemies.insert(enemy.id, id);
        }
        self.apply(combat.drain_events(), combat);
    }

    pub fn apply(&mut self, events: Vec<CombatEvent>, combat: &Combat) {
        for event in events {
            match event {
                CombatEvent::CardDrawn(card) => {
                    let mut factory = CardEntityFactory {
                        card: &card,
                        from: self.layout.draw_pile.into(),
                    };
                    let id = self.registry.instantiate(&mut factory);
                    self.cards.insert(card.id, id);
                    self.hand.push(card.id);
                }
                CombatEvent::HandChanged => self.layout_hand(),
                CombatEvent::HandDiscarded(ids) => {
                    for id in ids {
                        self.retire_card(id, CardDisposition::Discard);
                    }
                    self.layout_hand();
                }
                CombatEvent::CardPlayed(card, _) => {
                    self.hand.retain(|id| *id != card.id);
                }
                CombatEvent::CardResolved(id, disposition) => self.retire_card(id, disposition),
                CombatEvent::PlayerDamaged(report) => {
                    let at = self.player_anchor();
                    self.float_damage(report, at);
                }
                CombatEvent::PlayerHealed(amount) => {
                    let at = self.player_anchor();
                    self.float_text(format!("+{amount}"), at);
                }
                CombatEvent::EnemyDamaged(enemy, report) => {
                    let Some(id) = self.enemy_entity(enemy) else {
                        continue;
                    };
                    self.registry.play_animation(
                        id,
                        *HIT_FLASH_PRIORITY,
                        Animation::new().alpha(Tween::new(0.3, 1.0, 0.25)),
                    );
                    if let Some(at) = self.registry.get(id).map(|e| e.visual.position) {
                        self.float_damage(report, at);
                    }
                }
                CombatEvent::EnemyDied(enemy) => {
                    if let Some(id) = self.enemies.remove(&enemy) {
                        self.registry.play_animation(
                            id,
                            *CARD_DISCARD_PRIORITY,
                            Animation::new()
                                .alpha(Tween::from_current(0.0, *CARD_DISCARD_DURATION))
                                .then_destroy(),
                        );
                    }
                }
                _ => {}
            }
        }
        self.sync(combat);
    }

    /// Copies health, block and the upcoming intention onto the enemy entities.
    pub fn sync(&mut self, combat: &Combat) {
        for enemy in combat.enemies.values() {
            let Some(entity) = self
                .enemies
                .get(&enemy.id)
                .and_then(|id| self.registry.get_mut(*id))
            else {
                continue;
            };
            if let EntityKind::Enemy {
                health,
                block,
                intention,
                ..
            } = &mut entity.kind
            {
                *health = enemy.vitals.health;
                *block = enemy.vitals.block;
                *intention = Some(enemy.intention(combat.round).kind());
            }
        }
    }

    /// Lays out selectable cards, e.g. a reward offer or removal candidates.
    pub fn show_choices(&mut self, cards: &[Arc<CardDefinition>]) {
        self.clear_choices();
        let columns = 6usize;
        let pitch = self.layout.card_width + self.layout.card_spacing;
        for (i, definition) in cards.iter().enumerate() {
            let row = i / columns;
            let column = i % columns;
            let in_row = (cards.len() - row * columns).min(columns);
            let x = self.row_start(in_row) + column as f32 * pitch;
            let y = self.layout.height / 3.0 + row as f32 * self.layout.card_width * 1.5;
            let card = CardInstance::new(Arc::clone(definition));
            let mut factory = CardEntityFactory {
                card: &card,
                from: Vec2::new(x, y),
            };
            let id = self.registry.instantiate(&mut factory);
            self.choices.push(id);
        }
    }

    pub fn clear_choices(&mut self) {
        for id in std::mem::take(&mut self.choices) {
            self.registry.destroy(id);
        }
    }

    /// Updates every entity and returns the frame to draw.
    pub fn update(&mut self, dt: f64) -> Vec<RenderItem> {
        self.registry.update(dt)
    }

    pub fn sweep(&mut self) -> Vec<EntityId> {
        self.registry.sweep()
    }

    fn retire_card(&mut self, card: CardId, disposition: CardDisposition) {
        self.hand.retain(|id| *id != card);
        let Some(id) = self.cards.remove(&card) else {
            return;
        };
        let animation = match disposition {
            CardDisposition::Discard => Animation::new()
                .position(Tween::from_current(
                    self.layout.discard_pile.into(),
                    *CARD_DISCARD_DURATION,
                ))
                .scale(Tween::from_current(0.5, *CARD_DISCARD_DURATION)),
            CardDisposition::Exhaust => Animation::new()
                .position(Tween::from_current(
                    self.layout.exhaust_pile.into(),
                    *CARD_DISCARD_DURATION,
                ))
                .alpha(Tween::from_current(0.0, *CARD_DISCARD_DURATION)),
            CardDisposition::Delete => Animation::new()
                .scale(Tween::from_current(1.5, *CARD_DISCARD_DURATION))
                .alpha(Tween::from_current(0.0, *CARD_DISCARD_DURATION)),
        };
        self.registry
            .play_animation(id, *CARD_DISCARD_PRIORITY, animation.then_destroy());
    }

    fn layout_hand(&mut self) {
        let count = self.hand.len();
        let pitch = self.layout.card_width + self.layout.card_spacing;
        let start = self.row_start(count);
        for (slot, card) in self.hand.iter().enumerate() {
            let Some(id) = self.cards.get(card).copied() else {
                continue;
            };
            let target = Vec2::new(start + slot as f32 * pitch, self.layout.hand_y);
            if let Some(entity) = self.registry.get_mut(id) {
                entity.draw_priority = *HAND_DRAW_LAYER + slot as i32;
                entity.play_animation(
                    *DEFAULT_ANIMATION_PRIORITY,
                    Animation::new().position(Tween::from_current(target, *HAND_REPOSITION_DURATION)),
                );
            }
        }
    }

    fn row_start(&self, count: usize) -> f32 {
        let pitch = self.layout.card_width + self.layout.card_spacing;
        let total = count as f32 * pitch - self.layout.card_spacing;
        (self.layout.width - total) / 2.0 + self.layout.card_width / 2.0
    }

    fn enemy_slot(&self, slot: usize, count: usize) -> Vec2 {
        let x = self.layout.width * (slot + 1) as f32 / (count + 1) as f32;
        Vec2::new(x, self.layout.enemy_y)
    }

    fn player_anchor(&self) -> Vec2 {
        Vec2::new(self.layout.width / 2.0, self.layout.hand_y - 150.0)
    }

    fn float_damage(&mut self, report: DamageReport, at: Vec2) {
        if report.absorbed > 0 {
            self.float_text(format!("({} blocked)", report.absorbed), at + Vec2::new(0.0, 24.0));
        }
        if report.dealt > 0 {
            self.float_text(format!("-{}", report.dealt), at);
        }
    }

    fn float_text(&mut self, text: String, at: Vec2) {
        self.registry
            .instantiate(&mut FloatingTextFactory { text, at });
    }
}
