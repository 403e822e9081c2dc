//! End-to-end drone scenarios against the engine.

use glam::Vec2;
use hive_core::{Simulation, SystemRegistrationError};
use hive_drones::overlord::{self, Overlord};
use hive_drones::{build_simulation, kind, Mode, ScenarioSettings, State, Weapon};

fn wanderer(x: f32, y: f32) -> State {
    State {
        position: Some(Vec2::new(x, y)),
        mode: Some(Mode::Wander),
        ..Default::default()
    }
}

#[test]
fn acquire_target_within_sight() {
    let mut sim = Simulation::new();
    let a = sim.entities().add(State {
        sight_range: Some(5.0),
        ..wanderer(0.0, 0.0)
    });
    let b = sim.entities().add(wanderer(3.0, 0.0));
    sim.system_with("acquire", Overlord::new(1), |declare| {
        vec![overlord::acquire(declare)]
    })
    .unwrap();

    let report = sim.tick();

    assert_eq!(
        sim.entities().get(a).unwrap().get::<kind::Mode>(),
        Some(Mode::Attack { target: b })
    );
    // B has no sight range, so the behavior never visits it
    assert_eq!(sim.entities().get(b).unwrap().get::<kind::Mode>(), Some(Mode::Wander));
    assert_eq!(report.invocations("acquire", overlord::ACQUIRE), Some(1));
}

#[test]
fn drones_in_mutual_sight_target_each_other() {
    let mut sim = Simulation::new();
    let a = sim.entities().add(State {
        sight_range: Some(5.0),
        ..wanderer(0.0, 0.0)
    });
    let b = sim.entities().add(State {
        sight_range: Some(5.0),
        ..wanderer(3.0, 0.0)
    });
    sim.system_with("acquire", Overlord::new(1), |declare| {
        vec![overlord::acquire(declare)]
    })
    .unwrap();

    let report = sim.tick();

    assert_eq!(a.raw(), 0);
    assert_eq!(b.raw(), 1);
    assert_eq!(
        sim.entities().get(a).unwrap().get::<kind::Mode>(),
        Some(Mode::Attack { target: b })
    );
    assert_eq!(
        sim.entities().get(b).unwrap().get::<kind::Mode>(),
        Some(Mode::Attack { target: a })
    );
    assert_eq!(report.invocations("acquire", overlord::ACQUIRE), Some(2));
}

#[test]
fn target_out_of_sight_is_ignored() {
    let mut sim = Simulation::new();
    let a = sim.entities().add(State {
        sight_range: Some(3.0),
        ..wanderer(0.0, 0.0)
    });
    sim.entities().add(wanderer(3.0, 0.0));
    sim.system_with("acquire", Overlord::new(1), |declare| {
        vec![overlord::acquire(declare)]
    })
    .unwrap();

    sim.tick();
    assert_eq!(sim.entities().get(a).unwrap().get::<kind::Mode>(), Some(Mode::Wander));
}

#[test]
fn fatality_is_idempotent() {
    let mut sim = Simulation::new();
    let id = sim.entities().add(State {
        health: Some(0.0),
        mode: Some(Mode::Wander),
        ..Default::default()
    });
    sim.system_with("fatality", Overlord::new(1), |declare| {
        vec![overlord::fatality(declare)]
    })
    .unwrap();

    sim.tick();
    let after_first = sim.entities().get(id).unwrap().snapshot();
    assert_eq!(after_first.mode, Some(Mode::Dead));

    sim.tick();
    assert_eq!(sim.entities().get(id).unwrap().snapshot(), after_first);
}

#[test]
fn same_seed_same_outcome() {
    let settings = ScenarioSettings::default();
    let mut first = build_simulation(&settings).unwrap();
    let mut second = build_simulation(&settings).unwrap();

    first.run(60);
    second.run(60);

    assert_eq!(first.entities().snapshot(), second.entities().snapshot());
    assert_eq!(first.tick_count(), 60);
}

#[test]
fn overlord_cannot_be_registered_twice() {
    let mut sim = build_simulation(&ScenarioSettings::default()).unwrap();
    let existing = sim.system_handle(overlord::SYSTEM_NAME).unwrap();

    let error = overlord::register(&mut sim, 7).unwrap_err();
    assert_eq!(
        error,
        SystemRegistrationError::DuplicateName {
            name: overlord::SYSTEM_NAME.to_string(),
            existing,
        }
    );
    assert_eq!(sim.systems().count(), 1);
}

#[test]
fn duel_ends_with_a_dead_drone() {
    let weapon = Weapon {
        damage: 10.0,
        range: 1.5,
    };
    let settings = ScenarioSettings {
        seed: 3,
        ticks: 0,
        drones: vec![
            State::drone(Vec2::new(0.0, 0.0), 20.0, 10.0, weapon),
            State::drone(Vec2::new(4.0, 0.0), 20.0, 10.0, weapon),
        ],
    };
    let mut sim = build_simulation(&settings).unwrap();

    let mut dead_seen = Vec::new();
    for _ in 0..40 {
        sim.tick();
        for (id, state) in sim.entities().snapshot() {
            if dead_seen.contains(&id) {
                assert_eq!(state.mode, Some(Mode::Dead), "{id} left the dead state");
            } else if state.mode == Some(Mode::Dead) {
                dead_seen.push(id);
            }
        }
    }
    assert!(!dead_seen.is_empty());
}
