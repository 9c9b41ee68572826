//! Entity stores: in-memory collections with persistence and reactivity.
//!
//! # Responsibility
//! - Own one collection per entity kind and every mutation path into it.
//! - Run the commit cycle after each mutation: persist the full snapshot,
//!   then notify subscribers synchronously in subscription order.
//!
//! # Invariants
//! - Subscribers observe post-mutation state only.
//! - Failed operations neither persist nor notify.

use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::model::{EntityId, ValidationError};

pub mod goal_store;
pub mod routine_store;
pub mod subscription;
pub mod task_store;

pub type StoreResult<T> = Result<T, StoreError>;

/// Rejected store operation.
///
/// `NotFound` is an expected outcome callers must check, never a panic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// No record with the given id.
    NotFound(EntityId),
    /// Draft or patch rejected before any state change.
    Validation(ValidationError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Validation(err) => Some(err),
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}
