pub mod autopilot;
pub mod clock;
pub mod combat;
pub mod config;
pub mod deck;
pub mod dispatch;
pub mod dungeon;
pub mod outcome;
pub mod random;
pub mod removal;
pub mod run;
pub mod runtime;
pub mod save;
pub mod scene;
pub mod statics;

pub use autopilot::*;
pub use clock::*;
pub use combat::*;
pub use config::*;
pub use deck::*;
pub use dispatch::*;
pub use dungeon::*;
pub use outcome::*;
pub use random::*;
pub use removal::*;
pub use run::*;
pub use runtime::*;
pub use save::*;
pub use scene::*;
pub use statics::*;
