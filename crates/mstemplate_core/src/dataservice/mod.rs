//! Data service contracts and store implementations.
//!
//! # Responsibility
//! - Define the persistence contract consumed by the use-case layer.
//! - Isolate store details (SQL, in-memory maps) from orchestration.
//!
//! # Invariants
//! - Write paths validate the record before touching the store.
//! - Unknown ids on targeted writes surface as `DataServiceError::NotFound`.
//! - Listing returns records in store order (ascending id).

pub mod memory;
pub mod sqlite;

use crate::db::DbError;
use crate::model::example::{Example, ExampleId, ExamplePatch, ExampleValidationError};
use chrono::{DateTime, Utc};
use thiserror::Error;

pub use memory::InMemoryExampleDataService;
pub use sqlite::SqliteExampleDataService;

pub type DataResult<T> = Result<T, DataServiceError>;

/// Error raised by any data service implementation.
#[derive(Debug, Error)]
pub enum DataServiceError {
    #[error("{0}")]
    Validation(#[from] ExampleValidationError),
    #[error("{0}")]
    Db(#[from] DbError),
    #[error("example not found: {0}")]
    NotFound(ExampleId),
    #[error("invalid persisted example data: {0}")]
    InvalidData(String),
    #[error("database schema version {actual_version} does not match expected {expected_version}")]
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    #[error("required table `{0}` is missing")]
    MissingRequiredTable(&'static str),
    #[error("required column `{table}.{column}` is missing")]
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    /// Store-specific failure without a richer error type.
    #[error("data store failure: {0}")]
    Backend(String),
}

impl From<rusqlite::Error> for DataServiceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence contract for `Example` records.
pub trait ExampleDataService {
    /// Persists a new record and returns it with the store-assigned id.
    fn create(&self, example: &Example) -> DataResult<Example>;
    /// Replaces `name` and `useful` of an existing record.
    fn update(&self, example: &Example) -> DataResult<Example>;
    /// Applies the set fields of `patch` to an existing record.
    fn update_properties(&self, id: ExampleId, patch: &ExamplePatch) -> DataResult<()>;
    /// Physically removes a record.
    fn delete(&self, id: ExampleId) -> DataResult<()>;
    fn find_all(&self) -> DataResult<Vec<Example>>;
    fn find_actives(&self) -> DataResult<Vec<Example>>;
    fn find_by_id(&self, id: ExampleId) -> DataResult<Option<Example>>;
    /// Looks up the active record owning `name`.
    fn find_by_name(&self, name: &str) -> DataResult<Option<Example>>;
    /// Sets the deactivation timestamp of an existing record.
    fn logical_deletion(&self, id: ExampleId, deactivated_at: DateTime<Utc>) -> DataResult<()>;
}

/// Explicit transaction hooks for stores that support them.
pub trait Transactional {
    fn begin(&self) -> DataResult<()>;
    fn commit(&self) -> DataResult<()>;
    fn rollback(&self) -> DataResult<()>;
}
