pub mod cli;
pub mod engine;
pub mod utils;

pub use engine::{compute_address, prepare_to_sign, EngineError, PublicKeyProvider, Result, SignPreimage, StaticKeyProvider};
