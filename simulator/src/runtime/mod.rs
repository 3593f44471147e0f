pub mod animation;
pub mod entity;
pub mod registry;
pub mod tween;
pub mod vec2;

pub use animation::*;
pub use entity::*;
pub use registry::*;
pub use tween::*;
pub use vec2::*;
