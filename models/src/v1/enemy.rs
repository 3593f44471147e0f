use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentionKind {
    Heal,
    Weaken,
    Block,
    Attack,
    Idle,
}

/// One scripted enemy action. Heal and block are signed: a negative heal costs the
/// enemy health, a negative block strips its own block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Intention {
    pub heal: i32,
    pub block: i32,
    pub damage: u32,
}

impl Intention {
    pub fn kind(&self) -> IntentionKind {
        match (self.heal, self.block, self.damage) {
            (h, ..) if h > 0 => IntentionKind::Heal,
            (h, ..) if h < 0 => IntentionKind::Weaken,
            (_, b, _) if b > 0 => IntentionKind::Block,
            (_, b, _) if b < 0 => IntentionKind::Weaken,
            (_, _, d) if d > 0 => IntentionKind::Attack,
            _ => IntentionKind::Idle,
        }
    }

    pub fn describe(&self) -> Vec<String> {
        let mut lines = vec!["Next turn:".to_string()];
        if self.heal > 0 {
            lines.push("Will gain ? health.".to_string());
        }
        if self.heal < 0 {
            lines.push("Will lose ? health.".to_string());
        }
        if self.block > 0 {
            lines.push("Will gain ? block.".to_string());
        }
        if self.block < 0 {
            lines.push("Will lose ? block.".to_string());
        }
        if self.damage > 0 {
            lines.push(format!("Will deal {} damage.", self.damage));
        }
        if lines.len() == 1 {
            lines.push("Will do nothing.".to_string());
        }
        lines
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyTemplate {
    pub name: String,
    pub max_health_min: u32,
    pub max_health_max: u32,
    pub sprite: String,
    #[serde(default)]
    pub damaged_sprite: Option<String>,
    pub intention_pattern: Vec<Intention>,
}

impl EnemyTemplate {
    /// The intention for round `round`; the pattern repeats forever.
    pub fn intention(&self, round: usize) -> &Intention {
        &self.intention_pattern[round % self.intention_pattern.len()]
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.intention_pattern.is_empty() {
            anyhow::bail!("enemy {:?} has an empty intention pattern", self.name);
        }
        if self.max_health_min == 0 {
            anyhow::bail!("enemy {:?} can spawn with zero health", self.name);
        }
        if self.max_health_min > self.max_health_max {
            anyhow::bail!(
                "enemy {:?} has an inverted health range [{}, {}]",
                self.name,
                self.max_health_min,
                self.max_health_max
            );
        }
        Ok(())
    }
}

impl std::fmt::Display for EnemyTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Enemy<{}, hp=[{}, {}], pattern={}>",
            self.name,
            self.max_health_min,
            self.max_health_max,
            self.intention_pattern.len()
        )
    }
}
