use crate::ecs::{Behavior, KindSet, Schema};

/// Metadata describing one behavior of a registered system.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BehaviorDescriptor {
    name: String,
    kinds: KindSet,
    components: Vec<&'static str>,
}

impl BehaviorDescriptor {
    pub(crate) fn of<S: Schema, X: 'static>(behavior: &Behavior<S, X>) -> Self {
        Self {
            name: behavior.name().to_string(),
            kinds: behavior.kinds(),
            components: behavior.components(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Capability set as a kind bitset.
    pub fn kinds(&self) -> KindSet {
        self.kinds
    }

    /// Capability set as field names, in schema order.
    pub fn components(&self) -> &[&'static str] {
        &self.components
    }
}

/// Metadata describing a system and the behaviors it runs, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SystemDescriptor {
    name: String,
    behaviors: Vec<BehaviorDescriptor>,
    components: KindSet,
}

impl SystemDescriptor {
    /// Create a new descriptor with the provided name and no behaviors.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            behaviors: Vec::new(),
            components: KindSet::EMPTY,
        }
    }

    /// Append a behavior, keeping declaration order.
    pub fn push(&mut self, behavior: BehaviorDescriptor) {
        self.components = self.components.union(behavior.kinds);
        self.behaviors.push(behavior);
    }

    /// Unique system name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Behaviors in declaration (= execution) order.
    pub fn behaviors(&self) -> &[BehaviorDescriptor] {
        &self.behaviors
    }

    /// Union of every behavior's capability set.
    pub fn all_components(&self) -> KindSet {
        self.components
    }

    /// Whether the system declared no behaviors at all.
    pub fn is_empty(&self) -> bool {
        self.behaviors.is_empty()
    }
}
