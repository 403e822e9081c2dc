use crate::ecs::{
    Behavior, EntityStore, Others, Schema, SystemContext, SystemDescriptor, SystemHandle,
    SystemRegistrationError, TickReport,
};
use hive_metrics::BehaviorProfiler;
use std::collections::HashMap;

/// A registered system with its context type erased.
pub(crate) trait RunSystem<S: Schema> {
    fn run(
        &mut self,
        entities: &EntityStore<S>,
        tick: u64,
        report: &mut TickReport,
        profiler: &mut BehaviorProfiler,
    );
}

/// Behaviors of one system plus the private context they share.
pub(crate) struct SystemInstance<S: Schema, X> {
    name: String,
    local: X,
    behaviors: Vec<Behavior<S, X>>,
    profile_keys: Vec<String>,
}

impl<S: Schema, X: 'static> SystemInstance<S, X> {
    pub fn new(name: &str, local: X, behaviors: Vec<Behavior<S, X>>) -> Self {
        let profile_keys = behaviors
            .iter()
            .map(|behavior| format!("{}/{}", name, behavior.name()))
            .collect();
        Self {
            name: name.to_string(),
            local,
            behaviors,
            profile_keys,
        }
    }
}

impl<S: Schema, X: 'static> RunSystem<S> for SystemInstance<S, X> {
    fn run(
        &mut self,
        entities: &EntityStore<S>,
        tick: u64,
        report: &mut TickReport,
        profiler: &mut BehaviorProfiler,
    ) {
        for (behavior, key) in self.behaviors.iter().zip(&self.profile_keys) {
            let local = &mut self.local;
            let invocations = profiler.time_behavior(key, || {
                let selector = behavior.kinds();
                let mut after = None;
                let mut invocations = 0;
                while let Some((id, _, bag)) = entities.next_matching(after, selector) {
                    after = Some(id);
                    let mut cx = SystemContext {
                        others: Others::new(entities, id),
                        local: &mut *local,
                        tick,
                    };
                    if behavior.invoke(&mut cx, id, &bag) {
                        invocations += 1;
                    }
                }
                invocations
            });

            tracing::trace!(
                system = %self.name,
                behavior = behavior.name(),
                invocations,
                "behavior pass"
            );
            report.record(&self.name, behavior.name(), invocations);
        }
    }
}

pub(crate) struct SystemRegistry<S: Schema> {
    systems: Vec<RegisteredSystem<S>>,
    name_lookup: HashMap<String, SystemHandle>,
    next_handle: u32,
}

impl<S: Schema> SystemRegistry<S> {
    pub fn new() -> Self {
        Self {
            systems: Vec::new(),
            name_lookup: HashMap::new(),
            next_handle: 0,
        }
    }

    /// Fail if `name` is taken. Checked before a factory runs so a rejected
    /// registration has no side effects.
    pub fn ensure_available(&self, name: &str) -> Result<(), SystemRegistrationError> {
        match self.name_lookup.get(name) {
            Some(existing) => Err(SystemRegistrationError::DuplicateName {
                name: name.to_string(),
                existing: *existing,
            }),
            None => Ok(()),
        }
    }

    pub fn register(
        &mut self,
        descriptor: SystemDescriptor,
        runner: Box<dyn RunSystem<S>>,
    ) -> Result<SystemHandle, SystemRegistrationError> {
        self.ensure_available(descriptor.name())?;

        let handle = SystemHandle::new(self.next_handle);
        self.next_handle += 1;

        self.name_lookup.insert(descriptor.name().to_string(), handle);
        self.systems.push(RegisteredSystem {
            handle,
            descriptor,
            runner,
        });

        Ok(handle)
    }

    pub fn remove(&mut self, name: &str) -> Result<SystemDescriptor, SystemRegistrationError> {
        let handle = self
            .name_lookup
            .remove(name)
            .ok_or_else(|| SystemRegistrationError::UnknownSystem {
                name: name.to_string(),
            })?;
        let position = self
            .systems
            .iter()
            .position(|system| system.handle == handle)
            .ok_or_else(|| SystemRegistrationError::UnknownSystem {
                name: name.to_string(),
            })?;
        Ok(self.systems.remove(position).descriptor)
    }

    pub fn descriptor(&self, handle: SystemHandle) -> Option<&SystemDescriptor> {
        self.systems
            .iter()
            .find(|system| system.handle == handle)
            .map(|system| &system.descriptor)
    }

    pub fn handle_of(&self, name: &str) -> Option<SystemHandle> {
        self.name_lookup.get(name).copied()
    }

    /// Systems in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (SystemHandle, &SystemDescriptor)> {
        self.systems
            .iter()
            .map(|system| (system.handle, &system.descriptor))
    }

    pub fn runners_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn RunSystem<S>>> {
        self.systems.iter_mut().map(|system| &mut system.runner)
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }
}

struct RegisteredSystem<S: Schema> {
    handle: SystemHandle,
    descriptor: SystemDescriptor,
    runner: Box<dyn RunSystem<S>>,
}
