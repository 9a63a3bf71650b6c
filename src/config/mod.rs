//! Application configuration module
//!
//! Handles environment variables, project layout and default values.

mod constants;
mod settings;

pub use constants::*;
pub use settings::{Config, DbEngine};
