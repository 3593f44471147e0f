pub mod enemy;
pub mod event;
pub mod fight;
pub mod id;
pub mod vitals;

pub use enemy::*;
pub use event::*;
pub use fight::*;
pub use id::*;
pub use vitals::*;
