//! Seeded synthesis of a rotating disk galaxy.
//!
//! Every orbiting particle consumes the generator in the same fixed order (radius, angle,
//! speed jitter, mass, heavy-body roll), so a seed and a count fully determine the result.
use std::f64::consts::TAU;
use crate::particles::Particles;
use crate::utils::DeterministicRng;

/// Shape of the generated disk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GalaxyModel {
    pub max_radius: f64,
    /// Multiplier on `sqrt(max(min_orbit_radius, r))` giving the circular speed.
    pub orbital_speed_scale: f64,
    pub min_orbit_radius: f64,
    pub speed_jitter: (f64, f64),
    pub mass_range: (f64, f64),
    /// A particle becomes heavy when `next_u32() & heavy_mask == 0`.
    pub heavy_mask: u32,
    pub heavy_multiplier: f64,
    pub anchor_mass: f64,
}

impl Default for GalaxyModel {
    fn default() -> Self {
        Self {
            max_radius: 560.0,
            orbital_speed_scale: 5.0,
            min_orbit_radius: 25.0,
            speed_jitter: (0.86, 1.14),
            mass_range: (0.65, 1.55),
            heavy_mask: 2047,
            heavy_multiplier: 70.0,
            anchor_mass: 24_000.0,
        }
    }
}

/// Fills `particles` with `count` bodies of the default [`GalaxyModel`].
///
/// # Examples
///
/// ```
/// use rs_gravity::particles::{generate_galaxy, Particles};
///
/// let mut particles = Particles::default();
/// generate_galaxy(&mut particles, 100, 42);
///
/// assert_eq!(particles.count(), 100);
/// // The anchor always comes last.
/// assert_eq!(particles.position(99), (0.0, 0.0));
/// assert_eq!(particles.mass[99], 24_000.0);
/// ```
pub fn generate_galaxy(particles: &mut Particles, count: usize, seed: u32) {
    generate_galaxy_with(particles, count, seed, &GalaxyModel::default());
}

/// Clears `particles` and writes `count - 1` orbiting bodies followed by one anchor at rest at
/// the origin. A `count` of zero leaves the store empty.
pub fn generate_galaxy_with(particles: &mut Particles, count: usize, seed: u32, model: &GalaxyModel) {
    particles.clear();
    if count == 0 {
        return;
    }
    particles.reserve(count);

    let mut rng = DeterministicRng::new(seed);
    for _ in 0..count - 1 {
        // sqrt keeps the disk area-uniform
        let radius = rng.next_float01().sqrt() * model.max_radius;
        let angle = rng.range(0.0, TAU);
        let (sin, cos) = angle.sin_cos();

        let base_speed = radius.max(model.min_orbit_radius).sqrt() * model.orbital_speed_scale;
        let jitter = rng.range(model.speed_jitter.0, model.speed_jitter.1);
        let speed = base_speed * jitter;

        let mut mass = rng.range(model.mass_range.0, model.mass_range.1);
        if (rng.next_u32() & model.heavy_mask) == 0 {
            mass *= model.heavy_multiplier;
        }

        particles.add(radius * cos, radius * sin, -sin * speed, cos * speed, mass);
    }

    particles.add(0.0, 0.0, 0.0, 0.0, model.anchor_mass);
}
