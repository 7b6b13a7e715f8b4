//! Core infrastructure: RNG and errors.

pub mod error;
pub mod rng;

pub use error::EngineError;
pub use rng::GameRng;
