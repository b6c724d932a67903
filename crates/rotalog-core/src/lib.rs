//! rotalog core - Shared types, defaults and error handling

pub mod constants;
pub mod error;
pub mod types;

pub use constants::*;
pub use error::{Error, Result};
pub use types::*;
