//! Hive Drones
//!
//! Drone content for the hive engine: the component schema, a seeded random
//! stream, 2D helpers and the "overlord" system that makes drones wander,
//! hunt and destroy each other.

pub mod overlord;
pub mod rng;
pub mod settings;
pub mod state;
pub mod vector;

pub use overlord::Overlord;
pub use rng::SeededRng;
pub use settings::{ScenarioSettings, SettingsError};
pub use state::{kind, Mode, State, Weapon};

use hive_core::{Simulation, SystemRegistrationError};

/// Populate a simulation from `settings` and register the overlord system.
pub fn build_simulation(
    settings: &ScenarioSettings,
) -> Result<Simulation<State>, SystemRegistrationError> {
    let mut sim = Simulation::new();
    for drone in &settings.drones {
        sim.entities().add(drone.clone());
    }
    overlord::register(&mut sim, settings.seed)?;
    tracing::info!(
        drones = settings.drones.len(),
        seed = settings.seed,
        "scenario ready"
    );
    Ok(sim)
}
