//! Entity identifiers
//!
//! Ids are handed out by an `EntityStore` from a counter that starts at 0 and
//! only ever grows. A removed entity's id is never issued again, so a stale id
//! simply stops resolving instead of aliasing a newer entity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque entity handle, unique within one store.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(u64);

impl EntityId {
    /// Rebuild an id from its raw value (save data, tests, scripted content).
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw counter value backing this id.
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_round_trip_and_order() {
        let a = EntityId::from_raw(3);
        assert_eq!(a.raw(), 3);
        assert!(a < EntityId::from_raw(4));
        assert_eq!(a.to_string(), "#3");
    }

    #[test]
    fn serializes_as_bare_integer() {
        let json = serde_json::to_string(&EntityId::from_raw(42)).unwrap();
        assert_eq!(json, "42");
        let back: EntityId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, EntityId::from_raw(42));
    }
}
