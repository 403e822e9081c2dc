//! The "overlord" system: every drone behavior, sharing one random stream.
//!
//! Behaviors run in this order each tick:
//! 1. wandering movement
//! 2. attack pursuit movement
//! 3. acquire target when in proximity
//! 4. attack!
//! 5. fatality

use crate::rng::SeededRng;
use crate::state::{kind, Mode, State};
use crate::vector;
use glam::Vec2;
use hive_core::ecs::{Behavior, Declare, EntityId, EntityRef, Others};
use hive_core::{Simulation, SystemHandle, SystemRegistrationError};

pub const SYSTEM_NAME: &str = "overlord";

pub const WANDER: &str = "wandering movement";
pub const PURSUE: &str = "attack pursuit movement";
pub const ACQUIRE: &str = "acquire target when in proximity";
pub const ATTACK: &str = "attack!";
pub const FATALITY: &str = "fatality";

const STEPS: [f32; 3] = [-1.0, 0.0, 1.0];

/// Private context of the overlord system.
#[derive(Debug, Clone)]
pub struct Overlord {
    pub rng: SeededRng,
}

impl Overlord {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SeededRng::seed(seed),
        }
    }
}

/// Register the overlord system on `sim`.
pub fn register(
    sim: &mut Simulation<State>,
    seed: u64,
) -> Result<SystemHandle, SystemRegistrationError> {
    sim.system_with(SYSTEM_NAME, Overlord::new(seed), behaviors)
}

/// All overlord behaviors in execution order.
pub fn behaviors(declare: &Declare<State, Overlord>) -> Vec<Behavior<State, Overlord>> {
    vec![
        wander(declare),
        pursue(declare),
        acquire(declare),
        attack(declare),
        fatality(declare),
    ]
}

pub fn wander(declare: &Declare<State, Overlord>) -> Behavior<State, Overlord> {
    declare
        .behavior(WANDER)
        .requires::<(kind::Position, kind::Mode)>()
        .effect(|cx, (position, mode), _| {
            if mode.get() != Mode::Wander {
                return;
            }
            let rng = &mut cx.local.rng;
            let dx = rng.choose(&STEPS).copied().unwrap_or(0.0);
            let dy = rng.choose(&STEPS).copied().unwrap_or(0.0);
            let next = vector::add(position.get(), Vec2::new(dx, dy));
            if entity_at(cx.others.all(), next).is_none() {
                position.set(next);
            }
        })
}

pub fn pursue(declare: &Declare<State, Overlord>) -> Behavior<State, Overlord> {
    declare
        .behavior(PURSUE)
        .requires::<(kind::Position, kind::Mode)>()
        .effect(|cx, (position, mode), id| {
            let Mode::Attack { target } = mode.get() else {
                return;
            };
            let Some(target_position) = live_target(&cx.others, target)
                .and_then(|target| target.get::<kind::Position>())
            else {
                tracing::warn!(%id, %target, "pursuit target is gone, back to wandering");
                mode.set(Mode::Wander);
                return;
            };
            let next = vector::step_toward(position.get(), target_position);
            if entity_at(cx.others.all(), next).is_none() {
                position.set(next);
            }
        })
}

pub fn acquire(declare: &Declare<State, Overlord>) -> Behavior<State, Overlord> {
    declare
        .behavior(ACQUIRE)
        .requires::<(kind::Position, kind::Mode, kind::SightRange)>()
        .effect(|cx, (position, mode, sight_range), id| {
            if mode.get() != Mode::Wander {
                return;
            }
            if let Some(nearest) = nearest_drone(cx.others.all(), position.get()) {
                if nearest.distance < sight_range.get() {
                    tracing::debug!(%id, target = %nearest.id, "target acquired");
                    mode.set(Mode::Attack { target: nearest.id });
                }
            }
        })
}

pub fn attack(declare: &Declare<State, Overlord>) -> Behavior<State, Overlord> {
    declare
        .behavior(ATTACK)
        .requires::<(kind::Position, kind::Mode, kind::Weapon)>()
        .effect(|cx, (position, mode, weapon), id| {
            let Mode::Attack { target } = mode.get() else {
                return;
            };
            let Some(target) = live_target(&cx.others, target) else {
                tracing::warn!(%id, %target, "attack target is gone, back to wandering");
                mode.set(Mode::Wander);
                return;
            };
            let Some((target_position, health)) = target.view::<(kind::Position, kind::Health)>()
            else {
                return;
            };
            let weapon = weapon.get();
            if vector::distance(position.get(), target_position.get()) < weapon.range {
                health.update(|health| *health -= weapon.damage);
            }
        })
}

pub fn fatality(declare: &Declare<State, Overlord>) -> Behavior<State, Overlord> {
    declare
        .behavior(FATALITY)
        .requires::<(kind::Health, kind::Mode)>()
        .effect(|_, (health, mode), id| {
            if mode.get() != Mode::Dead && health.get() <= 0.0 {
                tracing::debug!(%id, "drone destroyed");
                mode.set(Mode::Dead);
            }
        })
}

/// First of `entities` standing exactly on `position`.
pub fn entity_at(
    entities: impl IntoIterator<Item = (EntityId, EntityRef<State>)>,
    position: Vec2,
) -> Option<EntityId> {
    entities
        .into_iter()
        .find(|(_, entity)| entity.get::<kind::Position>() == Some(position))
        .map(|(id, _)| id)
}

/// A drone found by [`nearest_drone`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearest {
    pub id: EntityId,
    pub distance: f32,
}

/// Closest living, positioned entity among `entities`. Ties go to the one
/// yielded first.
pub fn nearest_drone(
    entities: impl IntoIterator<Item = (EntityId, EntityRef<State>)>,
    position: Vec2,
) -> Option<Nearest> {
    let mut nearest: Option<Nearest> = None;
    for (id, entity) in entities {
        if entity.get::<kind::Mode>() == Some(Mode::Dead) {
            continue;
        }
        let Some(other) = entity.get::<kind::Position>() else {
            continue;
        };
        let distance = vector::distance(position, other);
        if nearest.map_or(true, |best| distance < best.distance) {
            nearest = Some(Nearest { id, distance });
        }
    }
    nearest
}

fn live_target(others: &Others<'_, State>, target: EntityId) -> Option<EntityRef<State>> {
    others
        .get(target)
        .filter(|entity| entity.get::<kind::Mode>() != Some(Mode::Dead))
}
