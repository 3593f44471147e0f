use std::sync::Arc;

use models::v1::{EnemyTemplate, Intention};

use super::{EnemyId, Health, Vitals};

#[derive(Clone, Debug)]
pub struct EnemyInstance {
    pub id: EnemyId,
    pub template: Arc<EnemyTemplate>,
    pub vitals: Vitals,
    pub turn_completed: bool,
}

impl EnemyInstance {
    pub fn new(id: EnemyId, template: Arc<EnemyTemplate>, max_health: u32) -> Self {
        Self {
            id,
            template,
            vitals: Vitals::new(Health::full(max_health)),
            turn_completed: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.template.name
    }

    pub fn intention(&self, round: usize) -> &Intention {
        self.template.intention(round)
    }

    pub fn is_dead(&self) -> bool {
        self.vitals.is_dead()
    }
}

impl std::fmt::Display for EnemyInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Enemy<{} {}, {}>", self.id, self.template.name, self.vitals)
    }
}
