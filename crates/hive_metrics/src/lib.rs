//! Hive Metrics - Common utilities for performance tracking
//!
//! Provides zero-cost abstractions for metrics collection that completely
//! vanish in production builds via feature flags.
//!
//! # Feature Flags
//!
//! - `metrics` - Enable metrics collection (default: disabled)
//!
//! # Usage
//!
//! ```ignore
//! use hive_metrics::TickTimer;
//!
//! let mut timer = TickTimer::new(60); // Track last 60 ticks
//! timer.begin();
//! let report = sim.tick();
//! timer.end(report.total_invocations());
//! println!("{:?}/tick, {:?}/invocation", timer.mean_tick(), timer.cost_per_invocation());
//! ```
//!
//! In production builds (without `metrics` feature), all instrumentation
//! is compiled out to zero overhead.

#[cfg(feature = "metrics")]
mod behavior_profiler;
#[cfg(feature = "metrics")]
mod counter;
#[cfg(feature = "metrics")]
mod tick_timer;

#[cfg(feature = "metrics")]
pub use behavior_profiler::BehaviorProfiler;
#[cfg(feature = "metrics")]
pub use counter::Counter;
#[cfg(feature = "metrics")]
pub use tick_timer::TickTimer;

/// Whether this build collects metrics.
pub const ENABLED: bool = cfg!(feature = "metrics");

// ============================================================================
// No-op stubs when metrics disabled
// ============================================================================

#[cfg(not(feature = "metrics"))]
#[derive(Debug, Default, Clone)]
pub struct TickTimer;

#[cfg(not(feature = "metrics"))]
impl TickTimer {
    pub fn new(_window: usize) -> Self { Self }
    pub fn begin(&mut self) {}
    pub fn end(&mut self, _invocations: usize) {}
    pub fn len(&self) -> usize { 0 }
    pub fn is_empty(&self) -> bool { true }
    pub fn mean_tick(&self) -> std::time::Duration { std::time::Duration::ZERO }
    pub fn tick_range(&self) -> (std::time::Duration, std::time::Duration) {
        (std::time::Duration::ZERO, std::time::Duration::ZERO)
    }
    pub fn mean_invocations(&self) -> f64 { 0.0 }
    pub fn cost_per_invocation(&self) -> std::time::Duration { std::time::Duration::ZERO }
}

#[cfg(not(feature = "metrics"))]
#[derive(Debug, Default, Clone)]
pub struct Counter;

#[cfg(not(feature = "metrics"))]
impl Counter {
    pub fn new() -> Self { Self }
    pub fn increment(&mut self, _name: &str, _value: usize) {}
    pub fn get(&self, _name: &str) -> usize { 0 }
    pub fn total(&self) -> usize { 0 }
    pub fn iter(&self) -> std::iter::Empty<(&str, usize)> { std::iter::empty() }
    pub fn clear(&mut self) {}
}

#[cfg(not(feature = "metrics"))]
#[derive(Debug, Default, Clone)]
pub struct BehaviorProfiler;

#[cfg(not(feature = "metrics"))]
impl BehaviorProfiler {
    pub fn new() -> Self { Self }
    pub fn time_behavior<F, R>(&mut self, _name: &str, f: F) -> R where F: FnOnce() -> R { f() }
    pub fn total(&self, _name: &str) -> std::time::Duration { std::time::Duration::ZERO }
    pub fn mean(&self, _name: &str) -> std::time::Duration { std::time::Duration::ZERO }
    pub fn samples(&self, _name: &str) -> u32 { 0 }
    pub fn iter(&self) -> std::iter::Empty<(&str, std::time::Duration)> { std::iter::empty() }
    pub fn reset(&mut self) {}
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_compiles_with_or_without_metrics() {
        let mut timer = super::TickTimer::new(60);
        timer.begin();
        timer.end(4);
        let mut counter = super::Counter::new();
        counter.increment("a", 1);
        let mut profiler = super::BehaviorProfiler::new();
        assert_eq!(profiler.time_behavior("a", || 3), 3);
        assert_eq!(super::ENABLED, cfg!(feature = "metrics"));
    }
}
