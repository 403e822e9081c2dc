//! Rolling per-tick cost

use std::collections::VecDeque;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
struct TickSample {
    elapsed: Duration,
    invocations: usize,
}

/// Wall time and behavior invocations of the most recent ticks.
///
/// Bracket each tick with [`begin`](Self::begin) and [`end`](Self::end); the
/// window keeps the last `window` ticks.
#[derive(Debug, Clone)]
pub struct TickTimer {
    started: Option<Instant>,
    samples: VecDeque<TickSample>,
    window: usize,
}

impl TickTimer {
    /// A zero window is bumped to one tick.
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            started: None,
            samples: VecDeque::with_capacity(window),
            window,
        }
    }

    pub fn begin(&mut self) {
        self.started = Some(Instant::now());
    }

    /// Close the tick opened by `begin`. Ignored without a matching `begin`.
    pub fn end(&mut self, invocations: usize) {
        let Some(started) = self.started.take() else {
            return;
        };
        self.record(started.elapsed(), invocations);
    }

    fn record(&mut self, elapsed: Duration, invocations: usize) {
        if self.samples.len() == self.window {
            self.samples.pop_front();
        }
        self.samples.push_back(TickSample {
            elapsed,
            invocations,
        });
    }

    /// Ticks currently in the window.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Mean wall time per tick.
    pub fn mean_tick(&self) -> Duration {
        if self.samples.is_empty() {
            return Duration::ZERO;
        }
        self.total_elapsed() / self.samples.len() as u32
    }

    /// Fastest and slowest tick in the window.
    pub fn tick_range(&self) -> (Duration, Duration) {
        let elapsed = self.samples.iter().map(|sample| sample.elapsed);
        let min = elapsed.clone().min().unwrap_or(Duration::ZERO);
        let max = elapsed.max().unwrap_or(Duration::ZERO);
        (min, max)
    }

    /// Mean number of effect invocations per tick.
    pub fn mean_invocations(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.total_invocations() as f64 / self.samples.len() as f64
    }

    /// Wall time per single effect invocation over the window.
    pub fn cost_per_invocation(&self) -> Duration {
        match u32::try_from(self.total_invocations()) {
            Ok(0) | Err(_) => Duration::ZERO,
            Ok(invocations) => self.total_elapsed() / invocations,
        }
    }

    fn total_elapsed(&self) -> Duration {
        self.samples.iter().map(|sample| sample.elapsed).sum()
    }

    fn total_invocations(&self) -> usize {
        self.samples.iter().map(|sample| sample.invocations).sum()
    }
}
