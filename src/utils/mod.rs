mod constants;
mod constants_config;
mod errors;
mod math_helpers;
mod deterministic_rng;

pub use constants::*;
pub use constants_config::*;
pub use errors::*;
pub use math_helpers::*;
pub use deterministic_rng::*;

#[cfg(test)]
mod deterministic_rng_tests;
