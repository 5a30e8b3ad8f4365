//! Configuration: environment settings and fixed constants.

mod constants;
mod settings;

pub use constants::*;
pub use settings::Config;
