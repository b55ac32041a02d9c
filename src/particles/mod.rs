mod particle;
mod initial_conditions;
mod particle_interactions_barnes_hut;
mod particle_interactions_direct;
mod particle_simulation;

pub use particle::*;
pub use initial_conditions::*;
pub use particle_interactions_barnes_hut::*;
pub use particle_interactions_direct::*;
pub use particle_simulation::*;

#[cfg(test)]
mod initial_conditions_tests;
