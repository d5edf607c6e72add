//! Read use-case: pass-through queries.

use super::UseCaseResult;
use crate::dataservice::ExampleDataService;
use crate::model::example::{Example, ExampleId};

/// Query entry points over a data service.
///
/// Results keep the order the store returns.
#[derive(Debug, Clone)]
pub struct ExampleReadUseCase<D: ExampleDataService> {
    data: D,
}

impl<D: ExampleDataService> ExampleReadUseCase<D> {
    pub fn new(data: D) -> Self {
        Self { data }
    }

    /// Lists every example, active or not.
    pub fn list_all(&self) -> UseCaseResult<Vec<Example>> {
        Ok(self.data.find_all()?)
    }

    /// Lists examples that were not logically deleted.
    pub fn list_active(&self) -> UseCaseResult<Vec<Example>> {
        Ok(self.data.find_actives()?)
    }

    pub fn get_by_id(&self, id: ExampleId) -> UseCaseResult<Option<Example>> {
        Ok(self.data.find_by_id(id)?)
    }

    /// Looks up the active example owning `name`.
    pub fn get_by_name(&self, name: &str) -> UseCaseResult<Option<Example>> {
        Ok(self.data.find_by_name(name)?)
    }
}
