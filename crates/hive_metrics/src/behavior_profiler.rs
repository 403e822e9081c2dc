//! Behavior profiler for timing named behavior passes

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

#[derive(Debug, Default, Clone, Copy)]
struct Timing {
    total: Duration,
    samples: u32,
}

/// Accumulated wall-clock time per named pass.
#[derive(Debug, Default, Clone)]
pub struct BehaviorProfiler {
    timings: BTreeMap<String, Timing>,
}

impl BehaviorProfiler {
    pub fn new() -> Self {
        Self {
            timings: BTreeMap::new(),
        }
    }

    pub fn time_behavior<F, R>(&mut self, name: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();

        let timing = self.timings.entry(name.to_string()).or_default();
        timing.total += elapsed;
        timing.samples += 1;
        result
    }

    pub fn total(&self, name: &str) -> Duration {
        self.timings
            .get(name)
            .map(|timing| timing.total)
            .unwrap_or(Duration::ZERO)
    }

    /// Average time per pass.
    pub fn mean(&self, name: &str) -> Duration {
        match self.timings.get(name) {
            Some(timing) if timing.samples > 0 => timing.total / timing.samples,
            _ => Duration::ZERO,
        }
    }

    /// Number of timed passes.
    pub fn samples(&self, name: &str) -> u32 {
        self.timings.get(name).map(|timing| timing.samples).unwrap_or(0)
    }

    /// Names with their total time, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Duration)> {
        self.timings
            .iter()
            .map(|(name, timing)| (name.as_str(), timing.total))
    }

    pub fn reset(&mut self) {
        self.timings.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn times_and_counts_passes() {
        let mut profiler = BehaviorProfiler::new();
        let value = profiler.time_behavior("wander/move", || 7);
        profiler.time_behavior("wander/move", || ());
        profiler.time_behavior("attack/strike", || ());

        assert_eq!(value, 7);
        assert_eq!(profiler.samples("wander/move"), 2);
        assert_eq!(profiler.samples("missing"), 0);
        assert!(profiler.mean("wander/move") <= profiler.total("wander/move"));
        let names: Vec<_> = profiler.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["attack/strike", "wander/move"]);

        profiler.reset();
        assert_eq!(profiler.iter().count(), 0);
    }
}
