//! Hive Engine Core
//!
//! A small entity-component simulation engine:
//! - Component schemas declared with [`schema!`]
//! - An entity store of partial component bags with selector queries
//! - Behaviors gated by a compile-time capability set
//! - Ordered systems of behaviors, run tick by tick

pub mod ecs;
pub mod time;

pub use ecs::{
    Behavior, Capability, Declare, EntityId, EntityRef, EntityStore, EntityStoreError, Kind,
    KindSet, Others, Schema, Simulation, Slot, SystemContext, SystemHandle,
    SystemRegistrationError, TickReport,
};

/// Engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
