use crate::ecs::SystemHandle;
use thiserror::Error;

/// Errors that can occur while adding or removing systems.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SystemRegistrationError {
    #[error("system '{name}' is already registered as {existing}")]
    DuplicateName {
        name: String,
        existing: SystemHandle,
    },

    #[error("no system named '{name}' is registered")]
    UnknownSystem { name: String },
}
