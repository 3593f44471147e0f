use std::cmp::Reverse;

use crate::{CardInstance, Combat, DungeonRun, PlayerAction, RunAction, RunOutcome, RunStage};

/// Deterministic policy used by the headless runner and the bench: hit as hard
/// as possible, take the first reward and the first room action, remove the
/// most expensive cards.
#[derive(Clone, Copy, Debug, Default)]
pub struct Autopilot;

impl Autopilot {
    pub fn decide(&self, run: &DungeonRun) -> Option<RunAction> {
        match run.stage() {
            RunStage::Combat(combat) => self.decide_combat(combat).map(RunAction::Combat),
            RunStage::Special(room) => match room.actions.is_empty() {
                true => None,
                false => Some(RunAction::ChooseAction(0)),
            },
            RunStage::ChoosingReward(cards) => Some(RunAction::ChooseReward(match cards.is_empty() {
                true => None,
                false => Some(0),
            })),
            RunStage::RemovingCards { removal, .. } => {
                let index = removal
                    .choices
                    .iter()
                    .enumerate()
                    .max_by_key(|(i, c)| (c.cost, Reverse(*i)))
                    .map(|(i, _)| i);
                Some(RunAction::RemoveCard(index))
            }
            RunStage::Pending | RunStage::Finished => None,
        }
    }

    pub fn decide_combat(&self, combat: &Combat) -> Option<PlayerAction> {
        if !combat.awaiting_player() {
            return None;
        }
        let enemies = combat.enemies.len() as u32;
        let damage = |card: &CardInstance| {
            let effects = &card.definition.effects;
            effects.target_damage + effects.damage_all * enemies
        };
        let best = combat
            .deck
            .hand
            .iter()
            .enumerate()
            .filter(|(_, card)| combat.can_play(card.id))
            .max_by_key(|(i, card)| (damage(*card), Reverse(*i)))
            .map(|(_, card)| card.id);
        match best {
            Some(id) => Some(PlayerAction::PlayCard(id)),
            None => Some(PlayerAction::EndTurn),
        }
    }

    /// Ticks `run` with this policy until it ends. Running past `max_ticks` is
    /// an error so a stalled run cannot spin forever.
    pub fn play_to_end(&self, run: &mut DungeonRun, max_ticks: u64) -> anyhow::Result<RunOutcome> {
        let dt = run.config().frame_delta;
        run.start()?;
        for _ in 0..max_ticks {
            if let Some(outcome) = run.outcome() {
                return Ok(outcome.clone());
            }
            let action = self.decide(run);
            run.tick(dt, action)?;
        }
        match run.outcome() {
            Some(outcome) => Ok(outcome.clone()),
            None => anyhow::bail!(
                "run {:?} did not finish within {max_ticks} ticks ({})",
                run.save().name,
                run.stage()
            ),
        }
    }
}
