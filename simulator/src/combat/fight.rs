use std::sync::Arc;

use indexmap::IndexMap;

use crate::{
    CardDisposition, CardId, CombatEvent, Deck, DungeonRng, EnemyId, EnemyInstance, GameTime,
    RunConfig, Vitals, clamp_draw_limit,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CombatPhase {
    PlayerTurn,
    EnemyTurn,
    PlayerWin,
    PlayerLose,
}

impl CombatPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, CombatPhase::PlayerWin | CombatPhase::PlayerLose)
    }
}

impl std::fmt::Display for CombatPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CombatPhase::PlayerTurn => write!(f, "player turn"),
            CombatPhase::EnemyTurn => write!(f, "enemy turn"),
            CombatPhase::PlayerWin => write!(f, "player win"),
            CombatPhase::PlayerLose => write!(f, "player lose"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerAction {
    PlayCard(CardId),
    SetTarget(EnemyId),
    EndTurn,
}

/// The persistent part of the player that a combat borrows and hands back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerState {
    pub vitals: Vitals,
    pub base_mana: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CombatSettings {
    pub pause_seconds: f64,
    pub draw_limit: i32,
}

impl Default for CombatSettings {
    fn default() -> Self {
        Self {
            pause_seconds: 2.0,
            draw_limit: 5,
        }
    }
}

impl From<&RunConfig> for CombatSettings {
    fn from(config: &RunConfig) -> Self {
        Self {
            pause_seconds: config.pause_seconds,
            draw_limit: config.draw_limit,
        }
    }
}

/// One room's fight. Advances at most one unit of logic per [`Combat::update`]:
/// a player action, one enemy's turn, or a phase transition.
#[derive(Clone, Debug)]
pub struct Combat {
    pub phase: CombatPhase,
    pub round: usize,
    pub player: PlayerState,
    pub mana: u32,
    /// Mana limit change for the rest of this combat.
    pub mana_limit_delta: i32,
    pub next_turn_mana: i32,
    pub draw_limit: i32,
    pub next_turn_draw: i32,
    pub deck: Deck,
    pub enemies: IndexMap<EnemyId, EnemyInstance>,
    pub target: Option<EnemyId>,
    pause: GameTime,
    settings: CombatSettings,
    events: Vec<CombatEvent>,
}

impl Combat {
    /// Builds the fight and enters the first player turn.
    pub fn start(
        player: PlayerState,
        enemies: Vec<EnemyInstance>,
        deck: Deck,
        settings: CombatSettings,
        rng: &mut DungeonRng,
    ) -> Self {
        let target = enemies.first().map(|e| e.id);
        let mut combat = Self {
            phase: CombatPhase::PlayerTurn,
            round: 0,
            player,
            mana: 0,
            mana_limit_delta: 0,
            next_turn_mana: 0,
            draw_limit: clamp_draw_limit(settings.draw_limit),
            next_turn_draw: 0,
            deck,
            enemies: enemies.into_iter().map(|e| (e.id, e)).collect(),
            target,
            pause: GameTime::ZERO,
            settings,
            events: Vec::new(),
        };
        combat.emit(CombatEvent::TargetChanged(target));
        combat.start_player_turn(rng);
        combat.check_outcome();
        combat
    }

    pub fn is_paused(&self) -> bool {
        !self.pause.is_elapsed()
    }

    pub fn pause_remaining(&self) -> GameTime {
        self.pause
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Ready for the player to act: their turn and no pause running.
    pub fn awaiting_player(&self) -> bool {
        self.phase == CombatPhase::PlayerTurn && !self.is_paused()
    }

    pub fn mana_limit(&self) -> u32 {
        apply_delta(self.player.base_mana, self.mana_limit_delta)
    }

    pub fn target_enemy(&self) -> Option<&EnemyInstance> {
        self.target.and_then(|id| self.enemies.get(&id))
    }

    pub fn drain_events(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn can_play(&self, id: CardId) -> bool {
        if !self.awaiting_player() {
            return false;
        }
        let Some(card) = self.deck.hand_card(id) else {
            return false;
        };
        if card.definition.cost > self.mana {
            return false;
        }
        !card.definition.effects.needs_target() || !self.enemies.is_empty()
    }

    /// Plays a card from hand. Unaffordable or unknown cards leave the state
    /// untouched and return `false`.
    pub fn play_card(&mut self, id: CardId, rng: &mut DungeonRng) -> bool {
        if !self.can_play(id) {
            return false;
        }
        let Some(card) = self.deck.take_from_hand(id) else {
            return false;
        };
        let definition = Arc::clone(&card.definition);
        let effects = &definition.effects;
        let target = match effects.needs_target() {
            true => self.ensure_target(),
            false => self.target,
        };
        tracing::debug!(card = %card, ?target, mana = self.mana, "playing card");

        self.mana -= definition.cost;
        self.emit(CombatEvent::CardPlayed(card.clone(), target));

        if effects.self_damage > 0 {
            let report = self.player.vitals.take_damage(effects.self_damage);
            self.emit(CombatEvent::PlayerDamaged(report));
        }
        if effects.self_block > 0 {
            self.player.vitals.gain_block(effects.self_block);
            self.emit(CombatEvent::PlayerBlockChanged(self.player.vitals.block));
        }
        if effects.self_heal > 0 {
            self.player.vitals.heal(effects.self_heal);
            self.emit(CombatEvent::PlayerHealed(effects.self_heal));
        }

        self.mana = apply_delta(self.mana, effects.change_mana);
        self.next_turn_mana += effects.change_mana_next_turn;

        if effects.change_draw_limit != 0 {
            self.draw_limit = clamp_draw_limit(self.draw_limit + effects.change_draw_limit);
        }
        self.next_turn_draw += effects.change_draw_limit_next_turn;

        self.mana_limit_delta += effects.change_mana_limit;
        self.player.base_mana =
            apply_delta(self.player.base_mana, effects.change_mana_limit_permanent);

        if let Some(target) = target {
            if effects.target_remove_block > 0 {
                if let Some(enemy) = self.enemies.get_mut(&target) {
                    enemy.vitals.lose_block(effects.target_remove_block);
                    let block = enemy.vitals.block;
                    self.emit(CombatEvent::EnemyBlockChanged(target, block));
                }
            }
            if effects.target_damage > 0 {
                self.damage_enemy(target, effects.target_damage);
            }
        }
        if effects.damage_all > 0 {
            let ids: Vec<EnemyId> = self.enemies.keys().copied().collect();
            for id in ids {
                self.damage_enemy(id, effects.damage_all);
            }
        }

        if effects.draw_additional_cards > 0 {
            self.draw_cards(effects.draw_additional_cards as usize, rng);
        }

        let disposition = if definition.delete {
            CardDisposition::Delete
        } else if definition.exhaust {
            self.deck.exhaust.push(Arc::clone(&definition));
            CardDisposition::Exhaust
        } else {
            self.deck.discard.push(Arc::clone(&definition));
            CardDisposition::Discard
        };
        self.emit(CombatEvent::CardResolved(card.id, disposition));
        self.emit(CombatEvent::HandChanged);

        self.check_outcome();
        true
    }

    pub fn set_target(&mut self, id: EnemyId) -> bool {
        if !self.enemies.contains_key(&id) {
            return false;
        }
        if self.target != Some(id) {
            self.target = Some(id);
            self.emit(CombatEvent::TargetChanged(self.target));
        }
        true
    }

    /// Ends the player turn: the hand is discarded, enemies drop their block and
    /// resolve one at a time after the pause.
    pub fn end_turn(&mut self) -> bool {
        if !self.awaiting_player() {
            return false;
        }
        let discarded = self.deck.discard_hand();
        self.emit(CombatEvent::HandDiscarded(
            discarded.iter().map(|c| c.id).collect(),
        ));
        let ids: Vec<EnemyId> = self.enemies.keys().copied().collect();
        for id in ids {
            if let Some(enemy) = self.enemies.get_mut(&id) {
                enemy.turn_completed = false;
                if enemy.vitals.block > 0 {
                    enemy.vitals.block = 0;
                    self.emit(CombatEvent::EnemyBlockChanged(id, 0));
                }
            }
        }
        self.emit(CombatEvent::TurnEnded);
        self.pause = GameTime(self.settings.pause_seconds);
        self.phase = CombatPhase::EnemyTurn;
        self.emit(CombatEvent::PhaseChanged(self.phase));
        true
    }

    /// Counts down the pause, then advances one unit. Returns whether `action`
    /// was accepted.
    pub fn update(
        &mut self,
        dt: f64,
        action: Option<PlayerAction>,
        rng: &mut DungeonRng,
    ) -> bool {
        if self.is_paused() {
            self.pause -= dt;
            if self.is_paused() {
                return false;
            }
            self.pause = GameTime::ZERO;
        }
        match self.phase {
            CombatPhase::PlayerTurn => match action {
                Some(PlayerAction::PlayCard(id)) => self.play_card(id, rng),
                Some(PlayerAction::SetTarget(id)) => self.set_target(id),
                Some(PlayerAction::EndTurn) => self.end_turn(),
                None => false,
            },
            CombatPhase::EnemyTurn => {
                self.enemy_step(rng);
                false
            }
            CombatPhase::PlayerWin | CombatPhase::PlayerLose => false,
        }
    }

    fn enemy_step(&mut self, rng: &mut DungeonRng) {
        let next = self
            .enemies
            .values()
            .find(|e| !e.turn_completed)
            .map(|e| e.id);
        match next {
            Some(id) => self.enemy_act(id),
            None => {
                self.round += 1;
                self.start_player_turn(rng);
            }
        }
    }

    fn enemy_act(&mut self, id: EnemyId) {
        let round = self.round;
        let Some(enemy) = self.enemies.get_mut(&id) else {
            return;
        };
        let intention = enemy.intention(round).clone();
        tracing::debug!(enemy = %enemy, round, ?intention, "enemy turn");
        let mut changes = Vec::new();
        if intention.heal != 0 {
            match intention.heal > 0 {
                true => enemy.vitals.heal(intention.heal.unsigned_abs()),
                false => enemy.vitals.lose_health(intention.heal.unsigned_abs()),
            }
            changes.push(CombatEvent::EnemyHealthChanged(
                id,
                enemy.vitals.health.current(),
            ));
        }
        if intention.block != 0 {
            match intention.block > 0 {
                true => enemy.vitals.gain_block(intention.block.unsigned_abs()),
                false => enemy.vitals.lose_block(intention.block.unsigned_abs()),
            }
            changes.push(CombatEvent::EnemyBlockChanged(id, enemy.vitals.block));
        }
        enemy.turn_completed = true;
        let died = enemy.is_dead();

        self.emit(CombatEvent::EnemyActed(id, intention.clone()));
        self.events.extend(changes);
        if died {
            self.remove_enemy(id);
        } else if intention.damage > 0 {
            let report = self.player.vitals.take_damage(intention.damage);
            self.emit(CombatEvent::PlayerDamaged(report));
        }
        self.pause = GameTime(self.settings.pause_seconds);
        self.check_outcome();
    }

    fn start_player_turn(&mut self, rng: &mut DungeonRng) {
        if !self.deck.hand.is_empty() {
            let discarded = self.deck.discard_hand();
            self.emit(CombatEvent::HandDiscarded(
                discarded.iter().map(|c| c.id).collect(),
            ));
        }
        self.mana = apply_delta(
            self.player.base_mana,
            self.mana_limit_delta + self.next_turn_mana,
        );
        self.next_turn_mana = 0;
        self.player.vitals.block = 0;
        self.emit(CombatEvent::PlayerBlockChanged(0));

        let count = clamp_draw_limit(self.draw_limit + self.next_turn_draw);
        self.next_turn_draw = 0;
        self.phase = CombatPhase::PlayerTurn;
        self.emit(CombatEvent::PhaseChanged(self.phase));
        self.draw_cards(count as usize, rng);
        self.emit(CombatEvent::TurnStarted {
            round: self.round,
            mana: self.mana,
        });
    }

    fn draw_cards(&mut self, count: usize, rng: &mut DungeonRng) {
        let result = self.deck.draw(count, rng);
        if result.reshuffled > 0 {
            self.emit(CombatEvent::DeckReshuffled(result.reshuffled));
        }
        if result.drawn.len() < count {
            tracing::debug!(
                requested = count,
                drawn = result.drawn.len(),
                "deck exhausted"
            );
        }
        for card in result.drawn {
            self.emit(CombatEvent::CardDrawn(card));
        }
        self.emit(CombatEvent::HandChanged);
    }

    fn damage_enemy(&mut self, id: EnemyId, amount: u32) {
        let Some(enemy) = self.enemies.get_mut(&id) else {
            return;
        };
        let report = enemy.vitals.take_damage(amount);
        let died = enemy.is_dead();
        self.emit(CombatEvent::EnemyDamaged(id, report));
        if died {
            self.remove_enemy(id);
        }
    }

    fn remove_enemy(&mut self, id: EnemyId) {
        if self.enemies.shift_remove(&id).is_none() {
            return;
        }
        tracing::debug!(%id, "enemy died");
        self.emit(CombatEvent::EnemyDied(id));
        if self.target == Some(id) {
            self.target = self.enemies.keys().next().copied();
            self.emit(CombatEvent::TargetChanged(self.target));
        }
    }

    fn ensure_target(&mut self) -> Option<EnemyId> {
        let valid = self.target.is_some_and(|id| self.enemies.contains_key(&id));
        if !valid {
            self.target = self.enemies.keys().next().copied();
            self.emit(CombatEvent::TargetChanged(self.target));
        }
        self.target
    }

    /// Lose beats win when one unit of logic causes both.
    fn check_outcome(&mut self) {
        if self.phase.is_terminal() {
            return;
        }
        let outcome = if self.player.vitals.is_dead() {
            CombatPhase::PlayerLose
        } else if self.enemies.is_empty() {
            CombatPhase::PlayerWin
        } else {
            return;
        };
        tracing::info!(phase = %outcome, round = self.round, "combat finished");
        self.phase = outcome;
        self.pause = GameTime(self.settings.pause_seconds);
        self.emit(CombatEvent::PhaseChanged(outcome));
    }

    fn emit(&mut self, event: CombatEvent) {
        self.events.push(event);
    }
}

impl std::fmt::Display for Combat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Combat(round {}, {}, ❤️ {}, mana {}/{}, {} enemies, {})",
            self.round,
            self.phase,
            self.player.vitals,
            self.mana,
            self.mana_limit(),
            self.enemies.len(),
            self.deck
        )
    }
}

fn apply_delta(value: u32, delta: i32) -> u32 {
    (value as i64 + delta as i64).clamp(0, u32::MAX as i64) as u32
}
