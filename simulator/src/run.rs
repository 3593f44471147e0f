use std::sync::{Arc, mpsc::Sender};

use gamedata::Catalog;
use models::v1::{CardDefinition, RoomDefinition, SaveState, SpecialRoom, SpecialRoomAction};

use crate::{
    CardRemoval, Combat, CombatPhase, CombatScene, CombatSettings, Deck, DispatchableEvent,
    DungeonGenerator, DungeonRng, GameTime, Health, PlayerAction, PlayerState, RenderItem,
    RunConfig, RunOutcome, RunSummary, SaveStore, Vitals,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunAction {
    Combat(PlayerAction),
    /// Index into the special room's actions.
    ChooseAction(usize),
    /// `None` skips the reward.
    ChooseReward(Option<usize>),
    /// `None` stops removing cards.
    RemoveCard(Option<usize>),
}

#[derive(Debug)]
pub enum RunStage {
    Pending,
    Combat(Box<Combat>),
    Special(Arc<SpecialRoom>),
    RemovingCards {
        removal: CardRemoval,
        deck: Deck,
        /// Rolled before the room's changes were applied.
        reward: Vec<Arc<CardDefinition>>,
    },
    ChoosingReward(Vec<Arc<CardDefinition>>),
    Finished,
}

impl std::fmt::Display for RunStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStage::Pending => write!(f, "pending"),
            RunStage::Combat(combat) => write!(f, "{combat}"),
            RunStage::Special(room) => write!(f, "special room {}", room.name),
            RunStage::RemovingCards { removal, .. } => {
                write!(f, "removing cards ({} left)", removal.remaining)
            }
            RunStage::ChoosingReward(cards) => write!(f, "choosing from {} rewards", cards.len()),
            RunStage::Finished => write!(f, "finished"),
        }
    }
}

/// One run through the dungeon for a save. Each [`DungeonRun::tick`] updates the
/// scene, advances one unit of run logic and sweeps destroyed entities.
#[derive(Debug)]
pub struct DungeonRun {
    catalog: Arc<Catalog>,
    config: RunConfig,
    store: Option<SaveStore>,
    save: SaveState,
    rng: DungeonRng,
    stage: RunStage,
    scene: CombatScene,
    frame: Vec<RenderItem>,
    is_boss: bool,
    rooms_visited: Vec<String>,
    rooms_cleared: u32,
    ticks: u64,
    elapsed: GameTime,
    outcome: Option<RunOutcome>,
    pub event_sender: Option<Sender<DispatchableEvent>>,
    pub stdout_enabled: bool,
}

impl DungeonRun {
    pub fn new(catalog: Arc<Catalog>, config: RunConfig, save: SaveState) -> Self {
        let rng = DungeonRng::for_room(save.seed, save.room_index);
        let scene = CombatScene::new(config.screen.clone(), config.leak_grace_seconds);
        Self {
            catalog,
            config,
            store: None,
            save,
            rng,
            stage: RunStage::Pending,
            scene,
            frame: Vec::new(),
            is_boss: false,
            rooms_visited: Vec::new(),
            rooms_cleared: 0,
            ticks: 0,
            elapsed: GameTime::ZERO,
            outcome: None,
            event_sender: None,
            stdout_enabled: false,
        }
    }

    /// Persists progress to `store` on every room entry and deletes it when the
    /// run ends.
    pub fn with_store(mut self, store: SaveStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_channel(mut self, sender: Sender<DispatchableEvent>) -> Self {
        self.event_sender = Some(sender);
        self
    }

    pub fn with_stdout(mut self) -> Self {
        self.stdout_enabled = true;
        self
    }

    pub fn save(&self) -> &SaveState {
        &self.save
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn stage(&self) -> &RunStage {
        &self.stage
    }

    pub fn combat(&self) -> Option<&Combat> {
        match &self.stage {
            RunStage::Combat(combat) => Some(combat),
            _ => None,
        }
    }

    pub fn scene(&self) -> &CombatScene {
        &self.scene
    }

    /// Draw list produced by the last tick.
    pub fn frame(&self) -> &[RenderItem] {
        &self.frame
    }

    pub fn is_boss_room(&self) -> bool {
        self.is_boss
    }

    pub fn rooms_visited(&self) -> &[String] {
        &self.rooms_visited
    }

    pub fn outcome(&self) -> Option<&RunOutcome> {
        self.outcome.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// Enters the save's current room. Ticking a pending run does this too.
    pub fn start(&mut self) -> anyhow::Result<()> {
        if matches!(self.stage, RunStage::Pending) {
            self.enter_room()?;
        }
        Ok(())
    }

    pub fn tick(&mut self, dt: f64, action: Option<RunAction>) -> anyhow::Result<()> {
        if self.is_finished() {
            return Ok(());
        }
        self.ticks += 1;
        self.elapsed += dt;
        self.frame = self.scene.update(dt);
        if let Err(error) = self.step(dt, action) {
            self.dispatch_event(&DispatchableEvent::Error(format!("{error:#}")));
            return Err(error);
        }
        self.scene.sweep();
        Ok(())
    }

    /// Ends the run early. The save is deleted.
    pub fn abandon(&mut self) -> anyhow::Result<RunOutcome> {
        if let Some(outcome) = &self.outcome {
            return Ok(outcome.clone());
        }
        self.finish(RunOutcome::Abandoned)
    }

    fn step(&mut self, dt: f64, action: Option<RunAction>) -> anyhow::Result<()> {
        match &mut self.stage {
            RunStage::Pending => self.enter_room(),
            RunStage::Combat(combat) => {
                let action = match action {
                    Some(RunAction::Combat(action)) => Some(action),
                    _ => None,
                };
                combat.update(dt, action, &mut self.rng);
                let events = combat.drain_events();
                self.scene.apply(events, combat);
                if combat.is_finished() && !combat.is_paused() {
                    self.finish_combat()?;
                }
                Ok(())
            }
            RunStage::Special(room) => {
                let Some(RunAction::ChooseAction(index)) = action else {
                    return Ok(());
                };
                let Some(chosen) = room.actions.get(index).cloned() else {
                    self.dispatch_event(&DispatchableEvent::Warning(format!(
                        "special room has no action {index}"
                    )));
                    return Ok(());
                };
                self.apply_special_action(&chosen)
            }
            RunStage::RemovingCards {
                removal,
                deck,
                reward,
            } => {
                let mut removed = None;
                match action {
                    Some(RunAction::RemoveCard(Some(index))) => {
                        let name = removal.choices.get(index).map(|c| c.name.clone());
                        if removal.select(deck, index) {
                            removed = name;
                            self.scene.show_choices(&removal.choices);
                        }
                    }
                    Some(RunAction::RemoveCard(None)) => removal.skip(),
                    _ => return Ok(()),
                }
                let done = removal.is_done();
                if done {
                    self.save.cards = deck.collection();
                }
                let reward = std::mem::take(reward);

                if let Some(name) = removed {
                    tracing::info!(card = %name, "card removed from deck");
                    self.dispatch_event(&DispatchableEvent::CardRemoved(name));
                }
                if !done {
                    return Ok(());
                }
                self.scene.clear_choices();
                self.offer_reward(reward)
            }
            RunStage::ChoosingReward(cards) => {
                let chosen = match action {
                    Some(RunAction::ChooseReward(Some(index))) => match cards.get(index) {
                        Some(card) => Some(Arc::clone(card)),
                        None => {
                            self.dispatch_event(&DispatchableEvent::Warning(format!(
                                "reward {index} is not on offer"
                            )));
                            return Ok(());
                        }
                    },
                    Some(RunAction::ChooseReward(None)) => None,
                    _ => return Ok(()),
                };
                let name = chosen.as_ref().map(|c| c.name.clone());
                if let Some(card) = chosen {
                    tracing::info!(card = %card, "reward taken");
                    self.save.cards.push(card);
                } else {
                    tracing::info!("reward skipped");
                }
                self.dispatch_event(&DispatchableEvent::RewardChosen(name));
                self.scene.clear_choices();
                self.advance_room()
            }
            RunStage::Finished => Ok(()),
        }
    }

    fn enter_room(&mut self) -> anyhow::Result<()> {
        let index = self.save.room_index;
        self.rng.reseed(self.save.seed, index);
        if let Some(store) = &self.store {
            store.save(&self.save)?;
        }

        let generator = DungeonGenerator::new(&self.catalog, &self.config);
        let room = generator.select_room(index, &mut self.rng)?;
        self.is_boss = generator.is_boss_room(index);
        self.rooms_visited.push(room.name().to_string());
        tracing::info!(room = index + 1, name = room.name(), boss = self.is_boss, "entering room");
        self.dispatch_event(&DispatchableEvent::RoomEntered(index, room.name().to_string()));
        self.scene.enter_room(room.background());

        match room {
            RoomDefinition::Combat(room) => {
                let enemies = generator.spawn_enemies(&room, &mut self.rng);
                let deck = Deck::from_collection(&self.save.cards, &mut self.rng);
                let mut combat = Combat::start(
                    self.player_state(),
                    enemies,
                    deck,
                    CombatSettings::from(&self.config),
                    &mut self.rng,
                );
                self.scene.load_combat(&mut combat);
                self.stage = RunStage::Combat(Box::new(combat));
            }
            RoomDefinition::Special(room) => {
                self.stage = RunStage::Special(room);
            }
        }
        Ok(())
    }

    fn player_state(&self) -> PlayerState {
        let max = self.config.player_max_health;
        PlayerState {
            vitals: Vitals::new(Health(self.save.player_health.min(max), max)),
            base_mana: self.save.player_base_mana,
        }
    }

    fn finish_combat(&mut self) -> anyhow::Result<()> {
        let RunStage::Combat(combat) = &self.stage else {
            return Ok(());
        };
        // The reward is rolled before anything is committed, so a failed roll
        // leaves the won combat in place instead of replaying the room.
        let phase = combat.phase;
        let reward = match phase {
            CombatPhase::PlayerWin if !self.is_boss => {
                self.roll_reward(self.config.reward_card_count as u32)?
            }
            _ => Vec::new(),
        };
        let RunStage::Combat(combat) = std::mem::replace(&mut self.stage, RunStage::Pending)
        else {
            return Ok(());
        };
        self.save.player_health = combat.player.vitals.health.current();
        self.save.player_base_mana = combat.player.base_mana;
        self.save.cards = combat.deck.collection();
        self.dispatch_event(&DispatchableEvent::CombatFinished(combat.phase));

        match combat.phase {
            CombatPhase::PlayerLose => self.finish(RunOutcome::Defeat).map(|_| ()),
            CombatPhase::PlayerWin => {
                self.rooms_cleared += 1;
                if self.is_boss {
                    return self.finish(RunOutcome::Victory).map(|_| ());
                }
                self.offer_reward(reward)
            }
            CombatPhase::PlayerTurn | CombatPhase::EnemyTurn => {
                self.stage = RunStage::Combat(combat);
                Ok(())
            }
        }
    }

    fn apply_special_action(&mut self, action: &SpecialRoomAction) -> anyhow::Result<()> {
        tracing::info!(action = %action.name, "special room action chosen");
        let reward = self.roll_reward(action.reward_card_count)?;
        let max = self.config.player_max_health;
        let change = action.effective_health_change(self.save.player_health);
        self.save.player_health =
            (self.save.player_health as i64 + change as i64).clamp(0, max as i64) as u32;
        self.save.player_base_mana =
            (self.save.player_base_mana as i64 + action.change_mana_permanent as i64).max(0) as u32;
        self.rooms_cleared += 1;

        if action.remove_card_count > 0 {
            let deck = Deck {
                draw: self.save.cards.clone(),
                ..Default::default()
            };
            let removal = CardRemoval::new(&deck, action.remove_card_count);
            if !removal.is_done() {
                self.scene.show_choices(&removal.choices);
                self.stage = RunStage::RemovingCards {
                    removal,
                    deck,
                    reward,
                };
                return Ok(());
            }
        }
        self.offer_reward(reward)
    }

    fn roll_reward(&mut self, count: u32) -> anyhow::Result<Vec<Arc<CardDefinition>>> {
        if count == 0 {
            return Ok(Vec::new());
        }
        DungeonGenerator::new(&self.catalog, &self.config)
            .generate_reward_cards(count as usize, &mut self.rng)
    }

    fn offer_reward(&mut self, cards: Vec<Arc<CardDefinition>>) -> anyhow::Result<()> {
        if cards.is_empty() {
            return self.advance_room();
        }
        self.dispatch_event(&DispatchableEvent::Log(format!(
            "reward offer: {}",
            cards.iter().map(|c| c.name.as_str()).collect::<Vec<_>>().join(", ")
        )));
        self.scene.show_choices(&cards);
        self.stage = RunStage::ChoosingReward(cards);
        Ok(())
    }

    fn advance_room(&mut self) -> anyhow::Result<()> {
        self.save.room_index += 1;
        self.enter_room()
    }

    fn summary(&self) -> RunSummary {
        RunSummary {
            save_name: self.save.name.clone(),
            seed: self.save.seed,
            rooms_cleared: self.rooms_cleared,
            rooms_visited: self.rooms_visited.clone(),
            final_health: self.save.player_health,
            deck_size: self.save.cards.len(),
            ticks: self.ticks,
            elapsed: self.elapsed,
        }
    }

    fn finish(&mut self, outcome: fn(RunSummary) -> RunOutcome) -> anyhow::Result<RunOutcome> {
        let outcome = outcome(self.summary());
        tracing::info!(result = %outcome.short_str(), save = %self.save.name, "run finished");
        if let Some(store) = &self.store {
            store.delete(&self.save.name)?;
        }
        self.dispatch_event(&DispatchableEvent::RunFinished(outcome.short_str()));
        self.stage = RunStage::Finished;
        self.outcome = Some(outcome.clone());
        Ok(outcome)
    }

    fn dispatch_event(&self, event: &DispatchableEvent) {
        if let Some(ref tx) = self.event_sender {
            let _ = tx.send(event.clone());
        }
        if self.stdout_enabled {
            eprintln!("EVENT: {:?}", event);
        }
    }
}
