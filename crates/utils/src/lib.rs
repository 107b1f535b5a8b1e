pub mod error;
#[cfg(feature = "full")]
pub mod settings;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
