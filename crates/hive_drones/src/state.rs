//! Drone component schema

use glam::Vec2;
use hive_core::{schema, EntityId};
use serde::{Deserialize, Serialize};

/// What a drone is doing. `Dead` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Mode {
    Wander,
    Attack { target: EntityId },
    Dead,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub damage: f32,
    pub range: f32,
}

schema! {
    /// Everything a drone may carry. Absent fields are absent components.
    #[derive(Serialize, Deserialize)]
    #[serde(default)]
    pub struct State in kind {
        health: Health => f32,
        position: Position => Vec2,
        mode: Mode => Mode,
        sight_range: SightRange => f32,
        weapon: Weapon => Weapon,
    }
}

impl State {
    /// A wandering drone with a full loadout.
    pub fn drone(position: Vec2, health: f32, sight_range: f32, weapon: Weapon) -> Self {
        Self {
            health: Some(health),
            position: Some(position),
            mode: Some(Mode::Wander),
            sight_range: Some(sight_range),
            weapon: Some(weapon),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hive_core::ecs::Schema;

    #[test]
    fn mode_uses_a_type_tag() {
        let json = serde_json::to_string(&Mode::Attack {
            target: EntityId::from_raw(4),
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"attack","target":4}"#);
        let dead: Mode = serde_json::from_str(r#"{"type":"dead"}"#).unwrap();
        assert_eq!(dead, Mode::Dead);
    }

    #[test]
    fn missing_fields_are_absent_components() {
        let state: State = serde_json::from_str(r#"{"position":[1.0,2.0]}"#).unwrap();
        assert_eq!(state.position, Some(Vec2::new(1.0, 2.0)));
        assert_eq!(state.health, None);
        assert_eq!(state.kinds().names::<State>(), vec!["position"]);
    }
}
