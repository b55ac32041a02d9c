use approx::assert_relative_eq;
use crate::particles::{generate_galaxy, generate_galaxy_with, GalaxyModel, Particles};

#[test]
fn test_galaxy_count_and_anchor() {
    let mut particles = Particles::default();
    generate_galaxy(&mut particles, 1_000, 13_371_337);
    assert_eq!(particles.count(), 1_000);

    let last = particles.count() - 1;
    assert_eq!(particles.position(last), (0.0, 0.0));
    assert_eq!(particles.velocity(last), (0.0, 0.0));
    assert_eq!(particles.mass[last], 24_000.0);
}

#[test]
fn test_single_particle_is_the_anchor() {
    let mut particles = Particles::default();
    generate_galaxy(&mut particles, 1, 5);
    assert_eq!(particles.count(), 1);
    assert_eq!(particles.mass[0], 24_000.0);
}

#[test]
fn test_generation_is_deterministic() {
    let mut a = Particles::default();
    let mut b = Particles::default();
    generate_galaxy(&mut a, 2_000, 42);
    generate_galaxy(&mut b, 2_000, 42);
    assert_eq!(a, b);

    let mut c = Particles::default();
    generate_galaxy(&mut c, 2_000, 43);
    assert_ne!(a.position_x, c.position_x);
}

#[test]
fn test_generation_replaces_previous_contents() {
    let mut particles = Particles::default();
    particles.add(9.0, 9.0, 9.0, 9.0, 9.0);
    generate_galaxy(&mut particles, 10, 1);
    assert_eq!(particles.count(), 10);
    assert_ne!(particles.position(0), (9.0, 9.0));
}

#[test]
fn test_orbiting_particles_respect_model_bounds() {
    let model = GalaxyModel::default();
    let mut particles = Particles::default();
    generate_galaxy_with(&mut particles, 5_000, 77, &model);

    for i in 0..particles.count() - 1 {
        let (x, y) = particles.position(i);
        let (vx, vy) = particles.velocity(i);
        let radius = (x * x + y * y).sqrt();
        assert!(radius <= model.max_radius + 1e-9, "particle {} at radius {}", i, radius);

        // Velocity is tangential: perpendicular to the radius vector.
        let radial = x * vx + y * vy;
        let speed = (vx * vx + vy * vy).sqrt();
        assert!(radial.abs() <= 1e-9 * (radius * speed).max(1.0), "particle {} has radial velocity", i);

        let base = radius.max(model.min_orbit_radius).sqrt() * model.orbital_speed_scale;
        assert!(speed >= base * 0.86 - 1e-9 && speed <= base * 1.14 + 1e-9, "particle {} speed {}", i, speed);

        let m = particles.mass[i];
        let light = m >= 0.65 && m < 1.55;
        let heavy = m >= 0.65 * 70.0 && m < 1.55 * 70.0;
        assert!(light || heavy, "particle {} mass {}", i, m);
    }
}

#[test]
fn test_custom_model() {
    let model = GalaxyModel {
        max_radius: 10.0,
        anchor_mass: 5.0,
        heavy_mask: 0,
        ..GalaxyModel::default()
    };
    let mut particles = Particles::default();
    generate_galaxy_with(&mut particles, 20, 3, &model);

    // A zero mask makes every orbiting body heavy.
    for i in 0..19 {
        assert!(particles.mass[i] >= 0.65 * 70.0);
        let (x, y) = particles.position(i);
        assert!((x * x + y * y).sqrt() <= 10.0 + 1e-9);
    }
    assert_relative_eq!(particles.mass[19], 5.0);
}
