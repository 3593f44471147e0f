mod card;
mod enemy;
mod level_range;
mod rarity;
mod room;
mod save;

pub use card::*;
pub use enemy::*;
pub use level_range::*;
pub use rarity::*;
pub use room::*;
pub use save::*;
