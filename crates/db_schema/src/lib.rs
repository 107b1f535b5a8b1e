pub mod newtypes;
pub mod source;
#[cfg(feature = "full")]
pub mod impls;
#[cfg(feature = "full")]
pub mod traits;
#[cfg(feature = "full")]
pub mod utils;
