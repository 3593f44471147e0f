use crate::GameTime;

#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    pub save_name: String,
    pub seed: u64,
    pub rooms_cleared: u32,
    pub rooms_visited: Vec<String>,
    pub final_health: u32,
    pub deck_size: usize,
    pub ticks: u64,
    pub elapsed: GameTime,
}

#[derive(Clone, Debug, PartialEq)]
pub enum RunOutcome {
    Victory(RunSummary),
    Defeat(RunSummary),
    Abandoned(RunSummary),
}

impl RunOutcome {
    pub fn inner_ref(&self) -> &RunSummary {
        match self {
            RunOutcome::Victory(r) | RunOutcome::Defeat(r) | RunOutcome::Abandoned(r) => r,
        }
    }

    pub fn short_str(&self) -> String {
        match self {
            RunOutcome::Victory(..) => "Victory".to_string(),
            RunOutcome::Defeat(..) => "Defeat".to_string(),
            RunOutcome::Abandoned(..) => "Abandoned".to_string(),
        }
    }
}

impl std::fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner_ref();
        writeln!(
            f,
            "[{}] {} ({}, seed 0x{:016x})",
            inner.elapsed,
            self.short_str(),
            inner.save_name,
            inner.seed
        )?;
        writeln!(
            f,
            "  rooms cleared: {}, final health: {}, deck: {} cards, ticks: {}",
            inner.rooms_cleared, inner.final_health, inner.deck_size, inner.ticks
        )?;
        for (index, room) in inner.rooms_visited.iter().enumerate() {
            writeln!(f, "  [{}] {room}", index + 1)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct OutcomeTally {
    pub total_runs: usize,
    pub victories: usize,
    pub defeats: usize,
    pub abandoned: usize,
    pub average_rooms_cleared: f32,
    pub average_final_health: f32,
}

impl From<&Vec<RunOutcome>> for OutcomeTally {
    fn from(results: &Vec<RunOutcome>) -> Self {
        let total_runs = results.len();
        let mut victories = 0;
        let mut defeats = 0;
        let mut abandoned = 0;
        let mut sum_rooms = 0f64;
        let mut sum_health = 0f64;

        for res in results.iter() {
            match res {
                RunOutcome::Victory(..) => victories += 1,
                RunOutcome::Defeat(..) => defeats += 1,
                RunOutcome::Abandoned(..) => abandoned += 1,
            }
            let inner = res.inner_ref();
            sum_rooms += inner.rooms_cleared as f64;
            sum_health += inner.final_health as f64;
        }

        let average = |sum: f64| {
            if total_runs > 0 {
                (sum / total_runs as f64) as f32
            } else {
                0.0
            }
        };

        OutcomeTally {
            total_runs,
            victories,
            defeats,
            abandoned,
            average_rooms_cleared: average(sum_rooms),
            average_final_health: average(sum_health),
        }
    }
}

impl std::fmt::Display for OutcomeTally {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} runs: {} victories, {} defeats, {} abandoned (avg {:.1} rooms, {:.1} health)",
            self.total_runs,
            self.victories,
            self.defeats,
            self.abandoned,
            self.average_rooms_cleared,
            self.average_final_health
        )
    }
}
