//! Example use-cases.
//!
//! # Responsibility
//! - Orchestrate data service calls into business operations.
//! - Enforce existence and name-uniqueness rules before writes.
//! - Translate persistence failures into domain errors.
//!
//! # Invariants
//! - Use-cases never bypass data service validation.
//! - Every data service failure reaches callers wrapped in `UseCaseError`.

pub mod creation;
pub mod read;
pub mod removal;

use crate::dataservice::{DataServiceError, ExampleDataService};
use crate::model::example::{Example, ExampleId, ExampleValidationError, PropertyError};
use thiserror::Error;

pub use creation::ExampleCreationUseCase;
pub use read::ExampleReadUseCase;
pub use removal::ExampleRemovalUseCase;

pub type UseCaseResult<T> = Result<T, UseCaseError>;

/// Domain error for example use-cases.
#[derive(Debug, Error)]
pub enum UseCaseError {
    /// Target example does not exist.
    #[error("No examples found for ID {0}")]
    NotExists(ExampleId),
    /// Another active example already owns the name.
    #[error("Example already exists with name `{0}`")]
    DuplicateName(String),
    /// Partial update names a property outside the allow-list.
    #[error("{0}")]
    InvalidProperty(#[from] PropertyError),
    #[error("{0}")]
    Validation(#[from] ExampleValidationError),
    #[error("{0}")]
    Message(String),
    /// Persistence-layer failure.
    #[error("{0}")]
    DataService(#[source] DataServiceError),
}

impl From<DataServiceError> for UseCaseError {
    fn from(value: DataServiceError) -> Self {
        match value {
            DataServiceError::NotFound(id) => Self::NotExists(id),
            other => Self::DataService(other),
        }
    }
}

/// Loads the record carrying `id`, failing with `NotExists` when absent.
fn require_existing<D: ExampleDataService>(data: &D, id: ExampleId) -> UseCaseResult<Example> {
    data.find_by_id(id)?.ok_or(UseCaseError::NotExists(id))
}
