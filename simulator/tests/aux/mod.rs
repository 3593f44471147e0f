pub mod catalog;
pub mod combat;
pub mod init;

#[allow(unused)]
pub use catalog::*;
#[allow(unused)]
pub use combat::*;
