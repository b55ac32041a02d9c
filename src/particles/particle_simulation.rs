//! Fixed-step Barnes-Hut gravity simulation.
//!
//! The simulation owns a structure-of-arrays particle store, a quadtree, a persistent worker
//! pool and the acceleration buffer. Each fixed step it
//!
//! 1. rebuilds the quadtree from the current positions,
//! 2. evaluates the tree force on every particle in parallel, each worker writing only its own
//!    slice of the acceleration buffer,
//! 3. integrates with symplectic Euler, clamping speeds to `velocity_clamp`.
//!
//! Steps 1 and 3 are serial. Given the same seed, count and parameters the results are
//! bit-identical regardless of the number of workers.
//!
//! # Example
//!
//! ```
//! use rs_gravity::particles::GravitySimulation;
//! use rs_gravity::utils::SimulationConfig;
//!
//! let config = SimulationConfig { worker_threads: 2, particle_count: 500, seed: 7 };
//! let mut sim = GravitySimulation::new(config);
//!
//! sim.params_mut().theta = 0.8;
//! sim.simulate(5);
//!
//! assert_eq!(sim.particles().count(), 500);
//! ```
use log::{debug, info};
use crate::parallel::ThreadPool;
use crate::particles::{generate_galaxy, BarnesHutTree, Particles};
use crate::utils::{SimulationConfig, SimulationError, SimulationParams, FORCE_EVALUATION_GRAIN};

pub struct GravitySimulation {
    config: SimulationConfig,
    params: SimulationParams,
    particles: Particles,
    tree: BarnesHutTree,
    accelerations: Vec<(f64, f64)>,
    pool: ThreadPool,
}

impl GravitySimulation {
    /// Creates a simulation with default [`SimulationParams`] and a freshly generated galaxy.
    ///
    /// Out-of-range inputs are clamped: at least one worker, at least one particle, and a zero
    /// seed replaced by the generator's fallback.
    pub fn new(config: SimulationConfig) -> Self {
        Self::with_params(config, SimulationParams::default())
    }

    pub fn with_params(config: SimulationConfig, params: SimulationParams) -> Self {
        let config = config.sanitized();
        let pool = ThreadPool::new(config.worker_threads);
        let mut sim = Self {
            config,
            params,
            particles: Particles::default(),
            tree: BarnesHutTree::new(),
            accelerations: Vec::new(),
            pool,
        };
        sim.reset();
        sim
    }

    /// Regenerates the initial galaxy from the configured seed and particle count.
    pub fn reset(&mut self) {
        generate_galaxy(&mut self.particles, self.config.particle_count, self.config.seed);
        self.accelerations.clear();
        self.accelerations.resize(self.particles.count(), (0.0, 0.0));
        info!(
            "Reset simulation: {} particles, seed {}, {} workers",
            self.particles.count(),
            self.config.seed,
            self.pool.worker_count()
        );
    }

    /// Advances the simulation by one fixed increment of `dt` seconds.
    pub fn step_fixed(&mut self, dt: f64) {
        self.compute_accelerations();
        self.integrate_symplectic_euler(dt);
    }

    /// [`GravitySimulation::step_fixed`] with the configured `fixed_time_step`.
    pub fn step(&mut self) {
        self.step_fixed(self.params.fixed_time_step);
    }

    pub fn simulate(&mut self, steps: usize) {
        for _ in 0..steps {
            self.step();
        }
        debug!("Simulated {} steps", steps);
    }

    pub fn particles(&self) -> &Particles {
        &self.particles
    }

    /// Accelerations computed by the most recent step, indexed like the particles.
    pub fn accelerations(&self) -> &[(f64, f64)] {
        &self.accelerations
    }

    /// The quadtree built by the most recent step.
    pub fn tree(&self) -> &BarnesHutTree {
        &self.tree
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    /// Unchecked live access for controllers tuning parameters between steps.
    pub fn params_mut(&mut self) -> &mut SimulationParams {
        &mut self.params
    }

    /// Replaces the parameters after checking them with [`SimulationParams::validate`].
    pub fn set_params(&mut self, params: SimulationParams) -> Result<(), SimulationError> {
        params.validate()?;
        self.params = params;
        Ok(())
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn worker_count(&self) -> usize {
        self.pool.worker_count()
    }

    fn compute_accelerations(&mut self) {
        self.tree.build(&self.particles);
        self.accelerations.fill((0.0, 0.0));
        if self.tree.is_empty() {
            return;
        }

        let tree = &self.tree;
        let particles = &self.particles;
        let params = &self.params;
        self.pool.parallel_chunks_mut(&mut self.accelerations, FORCE_EVALUATION_GRAIN, |start, chunk| {
            let mut stack = Vec::with_capacity(256);
            for (offset, acceleration) in chunk.iter_mut().enumerate() {
                *acceleration = tree.acceleration_on(start + offset, particles, params, &mut stack);
            }
        });
    }

    fn integrate_symplectic_euler(&mut self, dt: f64) {
        let clamp = self.params.velocity_clamp;
        let clamp_squared = clamp * clamp;
        let p = &mut self.particles;

        for (i, &(ax, ay)) in self.accelerations.iter().enumerate() {
            let mut vx = p.velocity_x[i] + ax * dt;
            let mut vy = p.velocity_y[i] + ay * dt;

            let v2 = vx * vx + vy * vy;
            if v2 > clamp_squared {
                let scale = clamp / v2.sqrt();
                vx *= scale;
                vy *= scale;
            }

            p.velocity_x[i] = vx;
            p.velocity_y[i] = vy;
            p.position_x[i] += vx * dt;
            p.position_y[i] += vy * dt;
        }
    }
}
