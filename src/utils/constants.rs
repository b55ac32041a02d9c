use crate::utils::{SimulationConfig, SimulationParams};

pub const DEFAULT_SIMULATION_PARAMS: SimulationParams = SimulationParams {
    gravitational_constant: 220.0,
    softening_length: 8.0,
    fixed_time_step: 1.0 / 60.0,
    theta: 2.0,
    velocity_clamp: 2600.0,
};

/// Seed used by the configuration layer when none is supplied.
pub const DEFAULT_SEED: u32 = 13_371_337;

/// Substituted by [`crate::utils::DeterministicRng`] for a zero seed, xorshift never leaves zero.
pub const FALLBACK_RNG_SEED: u32 = 0x1234_5678;

pub const DEFAULT_PARTICLE_COUNT: usize = 25_000;

/// `worker_threads` is resolved from the host at runtime, see [`SimulationConfig::default`].
pub const DEFAULT_SIMULATION_CONFIG: SimulationConfig = SimulationConfig {
    worker_threads: 1,
    particle_count: DEFAULT_PARTICLE_COUNT,
    seed: DEFAULT_SEED,
};

/// Range the live theta control clamps into.
///
/// Note that [`DEFAULT_SIMULATION_PARAMS`] starts theta at 2.0, outside this range; the first
/// adjustment snaps it back in.
pub const THETA_CONTROL_MIN: f64 = 0.25;
pub const THETA_CONTROL_MAX: f64 = 1.20;
pub const THETA_CONTROL_STEP: f64 = 0.05;

// Tree limits
pub const MAX_TREE_DEPTH: usize = 20;
pub const MIN_HALF_SIZE: f64 = 2.0;
pub const MIN_ROOT_HALF_SIZE: f64 = 512.0;
pub const ROOT_SPAN_SCALE: f64 = 0.75;
pub const ROOT_MARGIN: f64 = 128.0;

// Thread pool
pub const MIN_PARALLEL_GRAIN: usize = 256;
pub const FORCE_EVALUATION_GRAIN: usize = 16_384;
