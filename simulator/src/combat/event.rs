use models::v1::Intention;

use crate::{CardId, CardInstance, CombatPhase, DamageReport, EnemyId};

/// Where a played card ends up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardDisposition {
    Discard,
    Exhaust,
    Delete,
}

/// Effect intents emitted by the combat state machine. The scene turns them
/// into entity operations; combat never touches entities itself.
#[derive(Clone, Debug)]
pub enum CombatEvent {
    TurnStarted { round: usize, mana: u32 },
    DeckReshuffled(usize),
    CardDrawn(CardInstance),
    HandDiscarded(Vec<CardId>),
    HandChanged,
    CardPlayed(CardInstance, Option<EnemyId>),
    CardResolved(CardId, CardDisposition),
    PlayerDamaged(DamageReport),
    PlayerHealed(u32),
    PlayerBlockChanged(u32),
    EnemyDamaged(EnemyId, DamageReport),
    EnemyBlockChanged(EnemyId, u32),
    EnemyHealthChanged(EnemyId, u32),
    EnemyActed(EnemyId, Intention),
    EnemyDied(EnemyId),
    TargetChanged(Option<EnemyId>),
    TurnEnded,
    PhaseChanged(CombatPhase),
}
