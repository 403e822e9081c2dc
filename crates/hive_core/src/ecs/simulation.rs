// simulation.rs - Entity store + ordered systems + tick loop

use crate::ecs::system_registry::{SystemInstance, SystemRegistry};
use crate::ecs::{
    Behavior, BehaviorDescriptor, Declare, EntityStore, Schema, SystemDescriptor, SystemHandle,
    SystemRegistrationError,
};
use crate::time::TickClock;
use hive_metrics::{BehaviorProfiler, Counter};

/// Invocation count of one behavior during one tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BehaviorRun {
    pub system: String,
    pub behavior: String,
    pub invocations: usize,
}

/// What a tick did, in execution order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub tick: u64,
    pub runs: Vec<BehaviorRun>,
}

impl TickReport {
    pub fn new(tick: u64) -> Self {
        Self {
            tick,
            runs: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, system: &str, behavior: &str, invocations: usize) {
        self.runs.push(BehaviorRun {
            system: system.to_string(),
            behavior: behavior.to_string(),
            invocations,
        });
    }

    /// How many entities a behavior ran against, if it ran at all.
    pub fn invocations(&self, system: &str, behavior: &str) -> Option<usize> {
        self.runs
            .iter()
            .find(|run| run.system == system && run.behavior == behavior)
            .map(|run| run.invocations)
    }

    pub fn total_invocations(&self) -> usize {
        self.runs.iter().map(|run| run.invocations).sum()
    }
}

/// Owns the entity store and the ordered list of systems run each tick.
///
/// Systems run in registration order, behaviors in declaration order, and
/// each behavior visits its matching entities in store order. Everything
/// happens on the calling thread.
pub struct Simulation<S: Schema> {
    entities: EntityStore<S>,
    registry: SystemRegistry<S>,
    clock: TickClock,
    profiler: BehaviorProfiler,
    counter: Counter,
}

impl<S: Schema> Simulation<S> {
    pub fn new() -> Self {
        Self::with_entities(EntityStore::new())
    }

    /// Start from an already populated store.
    pub fn with_entities(entities: EntityStore<S>) -> Self {
        Self {
            entities,
            registry: SystemRegistry::new(),
            clock: TickClock::new(),
            profiler: BehaviorProfiler::new(),
            counter: Counter::new(),
        }
    }

    /// The entity store. Entities may be added or removed between ticks
    /// (and by effects during a tick).
    pub fn entities(&self) -> &EntityStore<S> {
        &self.entities
    }

    /// Register a system without private state.
    ///
    /// `factory` runs once, now, and returns the system's behaviors in the
    /// order they will execute.
    pub fn system<F>(
        &mut self,
        name: impl Into<String>,
        factory: F,
    ) -> Result<SystemHandle, SystemRegistrationError>
    where
        F: FnOnce(&Declare<S, ()>) -> Vec<Behavior<S, ()>>,
    {
        self.system_with(name, (), factory)
    }

    /// Register a system whose behaviors share the context `local`.
    ///
    /// The context is handed to every effect of this system as
    /// `cx.local` and lives as long as the system, so state such as a seeded
    /// random stream carries over from tick to tick. A duplicate `name` is
    /// rejected before `factory` is called.
    pub fn system_with<X, F>(
        &mut self,
        name: impl Into<String>,
        local: X,
        factory: F,
    ) -> Result<SystemHandle, SystemRegistrationError>
    where
        X: 'static,
        F: FnOnce(&Declare<S, X>) -> Vec<Behavior<S, X>>,
    {
        let name = name.into();
        self.registry.ensure_available(&name)?;

        let behaviors = factory(&Declare::new());

        let mut descriptor = SystemDescriptor::new(name.as_str());
        for behavior in &behaviors {
            descriptor.push(BehaviorDescriptor::of(behavior));
        }
        let instance = SystemInstance::new(&name, local, behaviors);
        let handle = self.registry.register(descriptor, Box::new(instance))?;

        tracing::debug!(
            system = %name,
            %handle,
            behaviors = ?self.registry.descriptor(handle).map(|d| d.behaviors().len()),
            "system registered"
        );
        Ok(handle)
    }

    /// Unregister a system; later ticks no longer run it.
    pub fn remove_system(&mut self, name: &str) -> Result<SystemDescriptor, SystemRegistrationError> {
        let descriptor = self.registry.remove(name)?;
        tracing::debug!(system = name, "system removed");
        Ok(descriptor)
    }

    /// Registered systems in execution order.
    pub fn systems(&self) -> impl Iterator<Item = (SystemHandle, &SystemDescriptor)> {
        self.registry.iter()
    }

    pub fn system_handle(&self, name: &str) -> Option<SystemHandle> {
        self.registry.handle_of(name)
    }

    pub fn descriptor(&self, handle: SystemHandle) -> Option<&SystemDescriptor> {
        self.registry.descriptor(handle)
    }

    /// Run every system once.
    pub fn tick(&mut self) -> TickReport {
        let tick = self.clock.tick_count();
        let mut report = TickReport::new(tick);

        for runner in self.registry.runners_mut() {
            runner.run(&self.entities, tick, &mut report, &mut self.profiler);
        }
        for run in &report.runs {
            self.counter
                .increment(&format!("{}/{}", run.system, run.behavior), run.invocations);
        }

        self.clock.advance_tick();
        tracing::debug!(
            tick,
            systems = self.registry.len(),
            entities = self.entities.len(),
            invocations = report.total_invocations(),
            "tick complete"
        );
        report
    }

    /// Run `ticks` ticks back to back.
    pub fn run(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    /// Ticks completed so far.
    pub fn tick_count(&self) -> u64 {
        self.clock.tick_count()
    }

    /// Accumulated time per `system/behavior` (empty without `metrics`).
    pub fn profiler(&self) -> &BehaviorProfiler {
        &self.profiler
    }

    /// Lifetime invocation totals per `system/behavior` (zero without `metrics`).
    pub fn counter(&self) -> &Counter {
        &self.counter
    }
}

impl<S: Schema> Default for Simulation<S> {
    fn default() -> Self {
        Self::new()
    }
}
