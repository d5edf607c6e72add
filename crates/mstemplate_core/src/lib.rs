//! Core domain logic for the example CRUD service.
//! Model, persistence contracts and use-cases live here; transport
//! adapters depend on this crate and never on a concrete store.

pub mod clock;
pub mod config;
pub mod dataservice;
pub mod db;
pub mod logging;
pub mod model;
pub mod usecase;

pub use clock::{Clock, SystemClock};
pub use config::{read_config, AppConfig, ConfigError, LoggingConfig, StoreConfig, StoreKind};
pub use dataservice::{
    DataResult, DataServiceError, ExampleDataService, InMemoryExampleDataService,
    SqliteExampleDataService, Transactional,
};
pub use logging::{
    default_log_level, init_logging, init_logging_from_config, logging_status, LoggingError,
};
pub use model::example::{
    Example, ExampleId, ExamplePatch, ExampleProperty, ExampleValidationError, PropertyError,
};
pub use usecase::{
    ExampleCreationUseCase, ExampleReadUseCase, ExampleRemovalUseCase, UseCaseError,
    UseCaseResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
