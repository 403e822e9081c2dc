//! Named counters for tracking behavior invocations

use std::collections::BTreeMap;

/// Monotonic totals keyed by name. Iteration is sorted by name so reports
/// come out the same on every run.
#[derive(Debug, Default, Clone)]
pub struct Counter {
    counters: BTreeMap<String, usize>,
}

impl Counter {
    pub fn new() -> Self {
        Self {
            counters: BTreeMap::new(),
        }
    }

    pub fn increment(&mut self, name: &str, value: usize) {
        if let Some(count) = self.counters.get_mut(name) {
            *count += value;
        } else {
            self.counters.insert(name.to_string(), value);
        }
    }

    pub fn get(&self, name: &str) -> usize {
        self.counters.get(name).copied().unwrap_or(0)
    }

    /// Sum over every name.
    pub fn total(&self) -> usize {
        self.counters.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counters.iter().map(|(name, count)| (name.as_str(), *count))
    }

    pub fn clear(&mut self) {
        self.counters.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_per_name() {
        let mut counter = Counter::new();
        counter.increment("wander/move", 3);
        counter.increment("attack/strike", 1);
        counter.increment("wander/move", 2);

        assert_eq!(counter.get("wander/move"), 5);
        assert_eq!(counter.get("missing"), 0);
        assert_eq!(counter.total(), 6);
        let names: Vec<_> = counter.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["attack/strike", "wander/move"]);

        counter.clear();
        assert_eq!(counter.total(), 0);
    }
}
