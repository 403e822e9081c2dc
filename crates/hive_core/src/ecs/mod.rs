//! Entity Component System core types.
//!
//! Entities are ids with a partial bag of components drawn from one schema.
//! Behaviors declare the component kinds they need; the store's matching
//! step is the only gate deciding which entities an effect runs on. Systems
//! group behaviors and run in registration order every tick.

mod behavior;
mod capability;
mod component;
mod entity;
mod simulation;
mod store;
mod system_descriptor;
mod system_handle;
mod system_registration_error;
mod system_registry;

pub use behavior::{Behavior, BehaviorBuilder, Declare, GatedBehavior, Others, SystemContext};
pub use capability::{Capability, Slot};
pub use component::{Kind, KindSet, Schema, MAX_KINDS};
pub use entity::EntityId;
pub use simulation::{BehaviorRun, Simulation, TickReport};
pub use store::{Entities, EntityRef, EntityStore, EntityStoreError, Query};
pub use system_descriptor::{BehaviorDescriptor, SystemDescriptor};
pub use system_handle::SystemHandle;
pub use system_registration_error::SystemRegistrationError;
