#[cfg(feature = "v1")]
pub mod v1;
