// src/utils/constants_config.rs
use log::warn;
use crate::utils::{
    DEFAULT_SIMULATION_PARAMS,
    DEFAULT_SIMULATION_CONFIG,
    FALLBACK_RNG_SEED,
    THETA_CONTROL_MAX,
    THETA_CONTROL_MIN,
    errors::SimulationError
};

/// Tunable physics parameters of a [`crate::particles::GravitySimulation`].
///
/// The controller may change any field between steps through
/// [`crate::particles::GravitySimulation::params_mut`]. The engine reads them fresh on every step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParams {
    pub gravitational_constant: f64,
    pub softening_length: f64,
    pub fixed_time_step: f64,
    /// Barnes-Hut opening threshold, smaller is more accurate.
    pub theta: f64,
    pub velocity_clamp: f64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        DEFAULT_SIMULATION_PARAMS
    }
}

impl SimulationParams {
    pub fn new(
        gravitational_constant: Option<f64>,
        softening_length: Option<f64>,
        fixed_time_step: Option<f64>,
        theta: Option<f64>,
        velocity_clamp: Option<f64>,
    ) -> Self {
        let default = DEFAULT_SIMULATION_PARAMS;
        Self {
            gravitational_constant: gravitational_constant.unwrap_or(default.gravitational_constant),
            softening_length: softening_length.unwrap_or(default.softening_length),
            fixed_time_step: fixed_time_step.unwrap_or(default.fixed_time_step),
            theta: theta.unwrap_or(default.theta),
            velocity_clamp: velocity_clamp.unwrap_or(default.velocity_clamp),
        }
    }

    /// Basic numeric sanity check. Nothing in the step depends on it, it exists for controllers
    /// that want to reject bad input before handing it over.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_gravity::utils::{SimulationError, SimulationParams};
    ///
    /// assert!(SimulationParams::default().validate().is_ok());
    ///
    /// let params = SimulationParams { fixed_time_step: 0.0, ..SimulationParams::default() };
    /// assert_eq!(params.validate(), Err(SimulationError::InvalidTimeStep));
    /// ```
    pub fn validate(&self) -> Result<(), SimulationError> {
        let fields = [
            ("gravitational_constant", self.gravitational_constant),
            ("softening_length", self.softening_length),
            ("fixed_time_step", self.fixed_time_step),
            ("theta", self.theta),
            ("velocity_clamp", self.velocity_clamp),
        ];
        if let Some(&(name, _)) = fields.iter().find(|(_, value)| !value.is_finite()) {
            return Err(SimulationError::NonFiniteParameter(name));
        }
        if self.gravitational_constant < 0.0 { return Err(SimulationError::InvalidGravitationalConstant); }
        if self.softening_length < 0.0 { return Err(SimulationError::InvalidSoftening); }
        if self.fixed_time_step <= 0.0 { return Err(SimulationError::InvalidTimeStep); }
        if self.theta <= 0.0 { return Err(SimulationError::InvalidTheta); }
        if self.velocity_clamp <= 0.0 { return Err(SimulationError::InvalidVelocityClamp); }
        Ok(())
    }

    /// Nudges theta by `delta` and clamps the result into the live control range
    /// [`THETA_CONTROL_MIN`, `THETA_CONTROL_MAX`].
    ///
    /// The default theta lies above this range, so the first call always lands inside it
    /// regardless of direction.
    ///
    /// # Examples
    ///
    /// ```
    /// use rs_gravity::utils::SimulationParams;
    ///
    /// let mut params = SimulationParams::default();
    /// assert_eq!(params.theta, 2.0);
    /// params.adjust_theta(0.05);
    /// assert_eq!(params.theta, 1.20);
    /// ```
    pub fn adjust_theta(&mut self, delta: f64) -> f64 {
        self.theta = (self.theta + delta).clamp(THETA_CONTROL_MIN, THETA_CONTROL_MAX);
        self.theta
    }

    pub fn softening_squared(&self) -> f64 {
        self.softening_length * self.softening_length
    }
}

/// Construction inputs of a [`crate::particles::GravitySimulation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationConfig {
    pub worker_threads: usize,
    pub particle_count: usize,
    pub seed: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            worker_threads: available_workers(),
            ..DEFAULT_SIMULATION_CONFIG
        }
    }
}

impl SimulationConfig {
    pub fn new(
        worker_threads: Option<usize>,
        particle_count: Option<usize>,
        seed: Option<u32>,
    ) -> Self {
        let default = DEFAULT_SIMULATION_CONFIG;
        Self {
            worker_threads: worker_threads.unwrap_or_else(available_workers),
            particle_count: particle_count.unwrap_or(default.particle_count),
            seed: seed.unwrap_or(default.seed),
        }
    }

    /// Returns a copy with every field forced into its valid domain: at least one worker,
    /// at least one particle and a non-zero seed.
    pub fn sanitized(self) -> Self {
        let mut config = self;
        if config.worker_threads == 0 {
            warn!("Worker thread count of 0 requested, using 1 worker");
            config.worker_threads = 1;
        }
        if config.particle_count == 0 {
            warn!("Particle count of 0 requested, using 1 particle");
            config.particle_count = 1;
        }
        if config.seed == 0 {
            warn!("Seed of 0 requested, substituting {:#x}", FALLBACK_RNG_SEED);
            config.seed = FALLBACK_RNG_SEED;
        }
        config
    }
}

fn available_workers() -> usize {
    match std::thread::available_parallelism() {
        Ok(count) => count.get(),
        Err(err) => {
            warn!("Could not query available parallelism ({}), defaulting to 1 worker", err);
            1
        }
    }
}
