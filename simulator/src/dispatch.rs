use crate::CombatPhase;

#[derive(Clone, Debug)]
pub enum DispatchableEvent {
    Log(String),
    Error(String),
    Warning(String),
    RoomEntered(u32, String),
    CombatFinished(CombatPhase),
    RewardChosen(Option<String>),
    CardRemoved(String),
    RunFinished(String),
}
