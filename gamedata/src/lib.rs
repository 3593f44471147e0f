mod catalog;
mod loader;

use std::path::PathBuf;

pub use catalog::*;
pub use loader::*;

lazy_static::lazy_static! {
    pub static ref BUNDLED_CONTENT_DIR: PathBuf =
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("res").join("content");
}
