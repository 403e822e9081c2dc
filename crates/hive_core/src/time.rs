//! Tick clock
//!
//! The simulation has no wall-clock notion of time; a tick is one full pass
//! over every system. Drivers decide how often to call `tick`.

/// Counts completed ticks.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickClock {
    tick_count: u64,
}

impl TickClock {
    pub fn new() -> Self {
        Self { tick_count: 0 }
    }

    /// Completed ticks; also the index of the tick about to run.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn advance_tick(&mut self) {
        self.tick_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero_and_counts_up() {
        let mut clock = TickClock::new();
        assert_eq!(clock.tick_count(), 0);
        clock.advance_tick();
        clock.advance_tick();
        assert_eq!(clock.tick_count(), 2);
    }
}
