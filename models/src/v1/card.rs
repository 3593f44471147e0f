use serde::{Deserialize, Serialize};

use super::Rarity;

/// Numeric effects of a card. Every field defaults to zero so content files only
/// list what a card actually does.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardEffects {
    pub damage_all: u32,
    pub target_damage: u32,
    pub target_remove_block: u32,
    pub self_damage: u32,
    pub self_block: u32,
    pub self_heal: u32,
    pub draw_additional_cards: u32,
    pub change_draw_limit: i32,
    pub change_draw_limit_next_turn: i32,
    pub change_mana_limit: i32,
    pub change_mana_limit_permanent: i32,
    pub change_mana: i32,
    pub change_mana_next_turn: i32,
}

impl CardEffects {
    pub fn needs_target(&self) -> bool {
        self.target_damage > 0 || self.target_remove_block > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub effects: CardEffects,
    pub cost: u32,
    #[serde(default)]
    pub exhaust: bool,
    #[serde(default)]
    pub delete: bool,
    #[serde(default)]
    pub rarity: Rarity,
    pub sprite: String,
}

impl CardDefinition {
    pub fn new(name: impl Into<String>, cost: u32, effects: CardEffects) -> Self {
        let mut card = Self {
            name: name.into(),
            description: String::new(),
            effects,
            cost,
            exhaust: false,
            delete: false,
            rarity: Rarity::Common,
            sprite: String::new(),
        };
        card.description = card.generate_description();
        card
    }

    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    pub fn with_exhaust(mut self) -> Self {
        self.exhaust = true;
        self.description = self.generate_description();
        self
    }

    pub fn with_delete(mut self) -> Self {
        self.delete = true;
        self.description = self.generate_description();
        self
    }

    /// Fills in the description from the effects unless the record carries one.
    pub fn ensure_description(&mut self) {
        if self.description.trim().is_empty() {
            self.description = self.generate_description();
        }
    }

    pub fn generate_description(&self) -> String {
        let e = &self.effects;
        let mut lines: Vec<String> = Vec::new();
        if e.damage_all != 0 {
            lines.push(format!("Deal {} damage to ALL enemies.", e.damage_all));
        }
        if e.target_damage != 0 {
            lines.push(format!("Deal {} damage.", e.target_damage));
        }
        if e.target_remove_block != 0 {
            lines.push(format!("Remove {} block from target.", e.target_remove_block));
        }
        if e.self_damage != 0 {
            lines.push(format!("Lose {} HP.", e.self_damage));
        }
        if e.self_block != 0 {
            lines.push(format!("Gain {} block.", e.self_block));
        }
        if e.self_heal != 0 {
            lines.push(format!("Heal {} HP.", e.self_heal));
        }
        if e.draw_additional_cards != 0 {
            lines.push(format!("Draw {} cards.", e.draw_additional_cards));
        }
        if e.change_draw_limit != 0 {
            lines.push(format!(
                "{} your draw limit by {} for the rest of this combat.",
                verb(e.change_draw_limit),
                e.change_draw_limit.unsigned_abs()
            ));
        }
        if e.change_draw_limit_next_turn != 0 {
            lines.push(format!(
                "{} your draw limit by {} for the next turn.",
                verb(e.change_draw_limit_next_turn),
                e.change_draw_limit_next_turn.unsigned_abs()
            ));
        }
        if e.change_mana_limit != 0 {
            lines.push(format!(
                "{} your mana limit by {} for the rest of this combat.",
                verb(e.change_mana_limit),
                e.change_mana_limit.unsigned_abs()
            ));
        }
        if e.change_mana_limit_permanent != 0 {
            lines.push(format!(
                "{} your mana limit by {} permanently.",
                verb(e.change_mana_limit_permanent),
                e.change_mana_limit_permanent.unsigned_abs()
            ));
        }
        if e.change_mana != 0 {
            lines.push(match e.change_mana > 0 {
                true => format!("Gain {} mana.", e.change_mana),
                false => format!("Lose {} mana.", e.change_mana.unsigned_abs()),
            });
        }
        if e.change_mana_next_turn != 0 {
            lines.push(match e.change_mana_next_turn > 0 {
                true => format!("Gain {} mana next turn.", e.change_mana_next_turn),
                false => format!(
                    "Lose {} mana next turn.",
                    e.change_mana_next_turn.unsigned_abs()
                ),
            });
        }
        if lines.is_empty() {
            lines.push("This card does nothing.".to_string());
        }
        if self.exhaust {
            lines.push("Exhaust.".to_string());
        }
        if self.delete {
            lines.push("Delete.".to_string());
        }
        lines.join("\n")
    }
}

fn verb(delta: i32) -> &'static str {
    if delta > 0 { "Increase" } else { "Decrease" }
}

impl std::fmt::Display for CardDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card<{} ({}), cost={}>", self.name, self.rarity, self.cost)
    }
}
