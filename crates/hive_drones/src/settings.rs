//! Scenario settings

use crate::state::{State, Weapon};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read scenario {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse scenario {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Initial drones plus the knobs of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioSettings {
    /// Seed of the overlord's random stream.
    pub seed: u64,
    /// Ticks the runtime runs when not told otherwise.
    pub ticks: u64,
    /// Initial component bags, added in order.
    pub drones: Vec<State>,
}

impl ScenarioSettings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

impl Default for ScenarioSettings {
    fn default() -> Self {
        let weapon = Weapon {
            damage: 10.0,
            range: 1.5,
        };
        let drones = [(0.0, 0.0), (6.0, 1.0), (-4.0, 5.0), (3.0, -6.0)]
            .into_iter()
            .map(|(x, y)| State::drone(Vec2::new(x, y), 30.0, 5.0, weapon))
            .collect();

        Self {
            seed: 1,
            ticks: 100,
            drones,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Mode;

    #[test]
    fn partial_json_keeps_defaults() {
        let settings = ScenarioSettings::from_json(r#"{"seed": 9}"#).unwrap();
        assert_eq!(settings.seed, 9);
        assert_eq!(settings.ticks, ScenarioSettings::default().ticks);
        assert_eq!(settings.drones.len(), 4);
    }

    #[test]
    fn drones_may_be_partial() {
        let settings = ScenarioSettings::from_json(
            r#"{"drones": [{"health": 0.0, "mode": {"type": "wander"}}, {}]}"#,
        )
        .unwrap();
        assert_eq!(settings.drones[0].mode, Some(Mode::Wander));
        assert_eq!(settings.drones[0].position, None);
        assert_eq!(settings.drones[1], State::default());
    }

    #[test]
    fn load_reports_the_path() {
        let error = ScenarioSettings::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(error, SettingsError::Io { .. }));
        assert!(error.to_string().contains("/definitely/not/here.json"));
    }
}
