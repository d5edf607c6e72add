//! Removal use-case: physical and logical deletion.
//!
//! # Invariants
//! - Unknown ids fail with `NotExists` before the store is touched.
//! - Logical deletion keeps the record readable through `list_all`.

use super::{require_existing, UseCaseResult};
use crate::dataservice::ExampleDataService;
use crate::model::example::ExampleId;
use chrono::{DateTime, Utc};
use log::info;

/// Delete entry points over a data service.
#[derive(Debug, Clone)]
pub struct ExampleRemovalUseCase<D: ExampleDataService> {
    data: D,
}

impl<D: ExampleDataService> ExampleRemovalUseCase<D> {
    pub fn new(data: D) -> Self {
        Self { data }
    }

    /// Removes the record from the store.
    pub fn delete_permanently(&self, id: ExampleId) -> UseCaseResult<()> {
        require_existing(&self.data, id)?;
        self.data.delete(id)?;
        info!("event=example_delete module=usecase status=ok id={id} mode=physical");
        Ok(())
    }

    /// Marks the record inactive as of `deactivated_at`.
    pub fn deactivate_logically(
        &self,
        id: ExampleId,
        deactivated_at: DateTime<Utc>,
    ) -> UseCaseResult<()> {
        require_existing(&self.data, id)?;
        self.data.logical_deletion(id, deactivated_at)?;
        info!("event=example_delete module=usecase status=ok id={id} mode=logical");
        Ok(())
    }
}
