//! Exact O(N^2) softened gravity, used as the reference the tree approximation is measured
//! against.
use rayon::prelude::*;
use crate::particles::Particles;
use crate::utils::{softened_acceleration, SimulationParams};

/// Exact acceleration on every particle from all others, in store order.
///
/// Each particle's sum runs over the sources in index order, so the result does not depend on
/// how Rayon schedules the outer loop.
///
/// # Examples
///
/// ```
/// use rs_gravity::particles::{direct_accelerations, Particles};
/// use rs_gravity::utils::SimulationParams;
///
/// let mut particles = Particles::default();
/// particles.add(0.0, 0.0, 0.0, 0.0, 1.0);
/// particles.add(2.0, 0.0, 0.0, 0.0, 1.0);
///
/// let params = SimulationParams { gravitational_constant: 4.0, softening_length: 0.0, ..SimulationParams::default() };
/// let acc = direct_accelerations(&particles, &params);
/// assert_eq!(acc, vec![(1.0, 0.0), (-1.0, 0.0)]);
/// ```
pub fn direct_accelerations(particles: &Particles, params: &SimulationParams) -> Vec<(f64, f64)> {
    let g = params.gravitational_constant;
    let softening_squared = params.softening_squared();

    (0..particles.count())
        .into_par_iter()
        .map(|i| {
            let (px, py) = particles.position(i);
            (0..particles.count())
                .filter(|&j| j != i)
                .fold((0.0, 0.0), |(ax, ay), j| {
                    let (dx, dy) = softened_acceleration(
                        px,
                        py,
                        particles.position_x[j],
                        particles.position_y[j],
                        particles.mass[j],
                        g,
                        softening_squared,
                    );
                    (ax + dx, ay + dy)
                })
        })
        .collect()
}
