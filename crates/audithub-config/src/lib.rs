//! Configuration for audithub
//!
//! Values are resolved with precedence CLI > environment > config file >
//! built-in defaults, and every effective value remembers where it came from.

mod config;

pub use config::*;
pub use audithub_utils::error;
