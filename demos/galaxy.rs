// demos/galaxy.rs
//
// Headless run of the default galaxy. Usage:
//   cargo run --release --example galaxy -- [particles] [steps] [theta]

use std::time::Instant;
use log::info;
use rs_gravity::particles::GravitySimulation;
use rs_gravity::utils::{SimulationConfig, SimulationParams};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let particle_count = args.next().map(|a| a.parse::<usize>()).transpose()?;
    let steps = args.next().map(|a| a.parse::<usize>()).transpose()?.unwrap_or(600);
    let theta = args.next().map(|a| a.parse::<f64>()).transpose()?;

    let config = SimulationConfig::new(None, particle_count, None);
    let mut sim = GravitySimulation::new(config);
    sim.set_params(SimulationParams::new(None, None, None, theta, None))?;

    println!("Initial state:");
    print_stats(&sim);

    let report_every = (steps / 10).max(1);
    let started = Instant::now();
    for step in 1..=steps {
        sim.step();
        if step % report_every == 0 {
            let elapsed = started.elapsed().as_secs_f64();
            info!("step {:>5}: {:.2} ms/step", step, 1_000.0 * elapsed / step as f64);
        }
    }

    println!("\nAfter {} steps ({:.2} s):", steps, started.elapsed().as_secs_f64());
    print_stats(&sim);
    println!("Tree: {} nodes, {} aggregate leaves", sim.tree().len(), sim.tree().aggregate_leaf_count());

    Ok(())
}

fn print_stats(sim: &GravitySimulation) {
    let particles = sim.particles();
    let (cx, cy) = particles.center_of_mass().unwrap_or((0.0, 0.0));
    println!(
        "{} particles on {} workers, theta {}",
        particles.count(),
        sim.worker_count(),
        sim.params().theta
    );
    println!("Total mass: {:.1}", particles.total_mass());
    println!("Center of mass: ({:.3}, {:.3})", cx, cy);
    println!("Kinetic energy: {:.3e}", particles.kinetic_energy());
    println!("Max speed: {:.2}", particles.max_speed());
}
